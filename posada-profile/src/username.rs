pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;

/// Checks the handle rules: 3-30 characters, lowercase letters, digits,
/// hyphens and underscores only. Usernames are immutable once a profile
/// exists and double as the public profile URL, so the rules are strict.
pub fn validate_username(username: &str) -> Result<(), UsernameError> {
    if username.len() < USERNAME_MIN_LEN {
        return Err(UsernameError::TooShort(username.len()));
    }
    if username.len() > USERNAME_MAX_LEN {
        return Err(UsernameError::TooLong(username.len()));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(UsernameError::InvalidCharacters);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum UsernameError {
    #[error("Username needs at least {USERNAME_MIN_LEN} characters (got {0})")]
    TooShort(usize),

    #[error("Username cannot exceed {USERNAME_MAX_LEN} characters (got {0})")]
    TooLong(usize),

    #[error("Username may only contain lowercase letters, digits, hyphens and underscores")]
    InvalidCharacters,
}
