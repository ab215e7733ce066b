/// Lower-cased domain of an email address.
///
/// Returns `None` for absent input and for anything without exactly one `@`.
/// No other format validation is attempted.
pub fn extract_domain(email: Option<&str>) -> Option<String> {
    let email = email?;
    let mut parts = email.split('@');
    let (_local, domain) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some(domain.to_lowercase())
}
