use crate::error::{Result, TellerError};
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(load_file: Option<String>, monochrome: bool) -> Result<()> {
    let mut settings = load_settings();

    if let Some(file) = load_file {
        let resolved = shellexpand_path(&file);
        if !std::path::Path::new(&resolved).is_file() {
            return Err(TellerError::Settings(format!("No accounts file found at {resolved}")));
        }
        settings.load_file = Some(resolved);
    }
    settings.color = !monochrome;

    save_settings(&settings)?;
    println!("Saved settings to {}", settings_path().display());
    if let Some(file) = &settings.load_file {
        println!("Sessions will start by loading {file}");
    }
    Ok(())
}
