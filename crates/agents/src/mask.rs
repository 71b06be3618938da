/// Mask an email for user-facing replies: `alice@example.com` becomes
/// `a***e@example.com`. Local parts of one or two characters keep only the
/// first character: `bo@x.com` becomes `b***@x.com`.
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return "***".into();
    };
    let mut chars = local.chars();
    let Some(first) = chars.next() else {
        return format!("***@{domain}");
    };
    let masked = match chars.next_back() {
        Some(last) if local.chars().count() > 2 => format!("{first}***{last}"),
        _ => format!("{first}***"),
    };
    format!("{masked}@{domain}")
}
