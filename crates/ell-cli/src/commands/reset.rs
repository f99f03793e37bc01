use crate::settings::Settings;

pub fn run(settings: &Settings) -> Result<(), String> {
    let mut saves = super::open_saves(&settings.save);
    let removed = saves
        .clear()
        .map_err(|e| format!("cannot delete save: {e}"))?;

    if removed {
        println!("  Saved game deleted.");
    } else {
        println!("  No saved game in {}.", settings.save.dir.display());
    }

    Ok(())
}
