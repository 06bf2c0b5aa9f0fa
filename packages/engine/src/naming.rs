/// Maps a database identifier such as `gmt_create` to the property name a
/// host derives for it (`gmtCreate`).
///
/// The character after each underscore is upper-cased and the underscores
/// are dropped. Everything else keeps its original case.
pub fn camel_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut upper_next = false;
    for ch in identifier.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
