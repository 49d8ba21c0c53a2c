use std::path::PathBuf;

/// Returns the path to the SmartNET database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/smartnet/smartnet.sqlite3`
/// - **Linux**: `~/.local/share/smartnet/smartnet.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\smartnet\smartnet.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    let db_path = data_dir.join("smartnet").join("smartnet.sqlite3");

    Ok(db_path)
}

/// Open the database, creating the file and running migrations on first use
pub fn initialize_database() -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = get_db_path()?;
    tracing::info!("Opening database at {}", db_path.display());

    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}
