use narrative_branches::ui::app::StoryApp;
use narrative_branches::ui::settings_io::load_settings;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Narrative Branches",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(StoryApp::new(settings)?))
        }),
    )
}
