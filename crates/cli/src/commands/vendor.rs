//! Vendor account commands.
//!
//! # Usage
//!
//! ```bash
//! # Register (logs the new vendor in)
//! MKT_PASSWORD=secret1 mkt vendor register -n "Ada" -e ada@shop.example -s "Ada's Lamps"
//!
//! # Log in / out
//! MKT_PASSWORD=secret1 mkt vendor login -e ada@shop.example
//! mkt vendor logout
//!
//! # Edit the logged-in vendor's profile
//! mkt vendor update --store-name "Ada's Lights"
//! ```

use clap::Args;
use secrecy::SecretString;

use marketplace_store::services::{AuthService, NewVendor, ProfileUpdate};

use super::{CommandError, open_store, output};

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Contact name
    #[arg(short, long)]
    pub name: String,

    /// Login email
    #[arg(short, long)]
    pub email: String,

    /// Password (at least 6 characters)
    #[arg(long, env = "MKT_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to the password)
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// Store display name
    #[arg(short, long)]
    pub store_name: String,

    /// Store description
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login email
    #[arg(short, long)]
    pub email: String,

    /// Password
    #[arg(long, env = "MKT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Profile fields to change; anything omitted keeps its current value.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Contact name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Login email
    #[arg(short, long)]
    pub email: Option<String>,

    /// Store display name
    #[arg(short, long)]
    pub store_name: Option<String>,

    /// Store description
    #[arg(short, long)]
    pub description: Option<String>,

    /// New password
    #[arg(long, env = "MKT_NEW_PASSWORD", hide_env_values = true)]
    pub new_password: Option<String>,
}

/// Register a vendor and log them in.
pub fn register(args: RegisterArgs, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let confirm = args
        .confirm_password
        .unwrap_or_else(|| args.password.clone());

    let vendor = AuthService::new(&mut store).register_vendor(NewVendor {
        name: args.name,
        email: args.email,
        password: SecretString::from(args.password),
        confirm_password: SecretString::from(confirm),
        store_name: args.store_name,
        description: args.description,
    })?;

    output::vendor(&vendor, json)
}

pub fn login(args: LoginArgs, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let vendor = AuthService::new(&mut store)
        .login_vendor(&args.email, &SecretString::from(args.password))?;
    output::vendor(&vendor, json)
}

pub fn logout() -> Result<(), CommandError> {
    let mut store = open_store()?;
    AuthService::new(&mut store).logout()?;
    Ok(())
}

pub fn whoami(json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let vendor = AuthService::new(&mut store)
        .current_vendor()?
        .ok_or(CommandError::NotLoggedIn)?;
    output::vendor(&vendor, json)
}

pub fn update(args: UpdateArgs, json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let mut auth = AuthService::new(&mut store);
    let current = auth.current_vendor()?.ok_or(CommandError::NotLoggedIn)?;

    let vendor = auth.update_profile(
        &current.id,
        ProfileUpdate {
            name: args.name.unwrap_or(current.name),
            email: args.email.unwrap_or_else(|| current.email.into_inner()),
            store_name: args.store_name.unwrap_or(current.store_name),
            description: args.description.unwrap_or(current.description),
            new_password: args.new_password.map(SecretString::from),
        },
    )?;

    output::vendor(&vendor, json)
}
