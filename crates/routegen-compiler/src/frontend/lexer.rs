//! Splits a route line into its three fields.

/// Splits on runs of whitespace into at most three fields.
///
/// The third field keeps its internal whitespace, since parameter lists
/// are written as `name: Type, name: Type`.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(3);
    let mut rest = line.trim();

    while !rest.is_empty() {
        if fields.len() == 2 {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }

    fields
}
