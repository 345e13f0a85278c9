pub fn derive_app_name(file_stem: &str) -> String {
    let stripped = strip_version_suffix(file_stem);
    let stripped = strip_bracketed_qualifiers(&stripped);
    let cleaned = stripped.trim().trim_end_matches(['-', '_']).trim_end();

    if cleaned.is_empty() {
        file_stem.to_string()
    } else {
        cleaned.to_string()
    }
}

fn strip_version_suffix(value: &str) -> String {
    let bytes = value.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if !byte.is_ascii_digit() {
            continue;
        }

        let mut start = index;
        if start > 0 && (bytes[start - 1] == b'v' || bytes[start - 1] == b'V') {
            start -= 1;
        }
        if start > 0 && (bytes[start - 1] == b'-' || bytes[start - 1] == b'_') {
            start -= 1;
        }
        return value[..start].to_string();
    }

    value.to_string()
}

fn strip_bracketed_qualifiers(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '(' && ch != '[' {
            result.push(ch);
            continue;
        }

        let mut skipped = String::new();
        let mut closed = false;
        for inner in chars.by_ref() {
            if inner == ')' || inner == ']' {
                closed = true;
                break;
            }
            skipped.push(inner);
        }

        if !closed {
            result.push(ch);
            result.push_str(&skipped);
        }
    }

    result
}
