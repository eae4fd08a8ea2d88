use notekeeper_core::config::API_URL_ENV;
use notekeeper_core::models::TagCase;
use notekeeper_core::util::non_blank;

use crate::cli::{ConfigCommands, TagCaseArg};
use crate::config_profiles::{validate_api_base_url, CliProfile, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_base_url,
            tag_case,
            timeout_secs,
            no_activate,
        } => run_config_init(
            global_profile,
            api_base_url,
            tag_case,
            timeout_secs,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    tag_case: Option<TagCaseArg>,
    timeout_secs: Option<u64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let api_base_url = non_blank(api_base_url.as_deref())
        .or_else(|| non_blank(std::env::var(API_URL_ENV).ok().as_deref()));
    let profile = config.profile_mut_or_default(&profile_name);
    apply_profile_update(profile, api_base_url, tag_case, timeout_secs)?;
    let configured = profile.api_base_url().is_some();

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    if configured {
        println!(
            "Run `notekeeper auth login --name <name> --password <password>` to sign in."
        );
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url");
    }

    Ok(())
}

/// Merge command-line values into a stored profile. Absent values keep the
/// stored ones; a zero timeout removes it.
pub fn apply_profile_update(
    profile: &mut CliProfile,
    api_base_url: Option<String>,
    tag_case: Option<TagCaseArg>,
    timeout_secs: Option<u64>,
) -> Result<(), CliError> {
    if let Some(url) = non_blank(api_base_url.as_deref()) {
        profile.api_base_url = Some(validate_api_base_url(&url)?);
    }
    if let Some(tag_case) = tag_case {
        profile.tag_case = TagCase::from(tag_case);
    }
    if let Some(seconds) = timeout_secs {
        profile.request_timeout_secs = (seconds > 0).then_some(seconds);
    }
    Ok(())
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);

    let Some(profile) = config.profile(&profile_name) else {
        println!("Profile '{profile_name}' is not configured.");
        return Ok(());
    };

    println!("Profile '{profile_name}'");
    println!("{}", serde_json::to_string_pretty(profile)?);
    if let Some(url) = non_blank(std::env::var(API_URL_ENV).ok().as_deref()) {
        println!("{API_URL_ENV} overrides api_base_url with {url}");
    }
    Ok(())
}
