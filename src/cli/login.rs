use dialoguer::Input;
use repo_sync::core::credentials::INSTALLATION_ID_KEY;
use repo_sync::core::{CredentialStore, SyncError, SyncResult};

pub fn run(installation_id: Option<u64>) -> SyncResult<()> {
    let installation_id = match installation_id {
        Some(id) => id,
        None => {
            println!("GitHub App Login");
            println!("Find the installation id in the app's installation settings URL.");
            println!();
            Input::<u64>::new()
                .with_prompt("Installation id")
                .interact_text()
                .map_err(|e| SyncError::Validation(format!("Failed to read input: {}", e)))?
        }
    };

    if installation_id == 0 {
        return Err(SyncError::Validation(
            "Installation id must be a positive integer".to_string(),
        ));
    }

    CredentialStore::store_installation_id(installation_id)?;

    println!();
    println!("✓ Installation id {} stored securely", installation_id);

    Ok(())
}

pub fn logout() -> SyncResult<()> {
    if !CredentialStore::exists(INSTALLATION_ID_KEY) {
        println!("No stored installation id");
        return Ok(());
    }

    CredentialStore::delete(INSTALLATION_ID_KEY)?;
    println!("✓ Stored installation id removed");

    Ok(())
}
