use notekeeper_core::{Action, Store};

use crate::auth::KeyringSessionStore;
use crate::cli::AuthCommands;
use crate::commands::common::CliContext;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Signup { name, password } => {
            let context = CliContext::open(global_profile)?;
            let message = context.controller.sign_up(&name, &password).await?;
            println!("{message}");
            println!(
                "Run `notekeeper auth login --name {name} --password <password>` to sign in."
            );
            Ok(())
        }
        AuthCommands::Login { name, password } => {
            let context = CliContext::open(global_profile)?;
            let snapshot = context.controller.login(&name, &password).await?;
            let label = snapshot
                .user
                .as_ref()
                .map_or_else(|| name.clone(), notekeeper_core::User::display_name);
            println!(
                "Profile '{}' is signed in as {}",
                context.profile_name, label
            );
            Ok(())
        }
        // Status and logout only touch the keychain, so they work without a
        // configured server.
        AuthCommands::Status => {
            let (profile_name, store) = open_session_store(global_profile)?;
            let snapshot = store.snapshot();
            match (&snapshot.token, &snapshot.user) {
                (Some(_), Some(user)) => println!(
                    "Profile '{}' is signed in as {}",
                    profile_name,
                    user.display_name()
                ),
                (Some(_), None) => println!("Profile '{profile_name}' has a stored token"),
                _ => println!("Profile '{profile_name}' is not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let (profile_name, store) = open_session_store(global_profile)?;
            store.dispatch(Action::Logout)?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}

fn open_session_store(
    global_profile: Option<&str>,
) -> Result<(String, Store<KeyringSessionStore>), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let store = Store::initialize(KeyringSessionStore::new(&profile_name))?;
    Ok((profile_name, store))
}
