use reqwest::Url;

const IMAGE_ENDPOINT: &str = "https://image.pollinations.ai/prompt/";

/// Link to an externally generated scene illustration for `prompt`.
pub fn scene_image_url(prompt: &str) -> Option<Url> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return None;
    }

    let mut url = Url::parse(IMAGE_ENDPOINT).ok()?;
    url.path_segments_mut().ok()?.pop_if_empty().push(prompt);
    url.query_pairs_mut()
        .append_pair("width", "1200")
        .append_pair("height", "600")
        .append_pair("nologo", "true");
    Some(url)
}
