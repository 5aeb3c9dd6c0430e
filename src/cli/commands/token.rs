use crate::auth::TokenService;
use crate::config::SecurityConfig;

/// Print a credential for `email`, e.g. to call admin routes while bootstrapping
/// the first admin. The credential grants nothing beyond the stored role.
pub fn handle(security: &SecurityConfig, email: &str) -> anyhow::Result<()> {
    let tokens = TokenService::new(&security.token_secret, security.token_ttl_days);
    let token = tokens.issue(email)?;
    println!("{}", token);
    Ok(())
}
