use std::collections::HashSet;

/// Name given to columns whose header has nothing usable left.
pub const UNNAMED_COLUMN: &str = "coluna_sem_nome";

/// Turns a spreadsheet header into a storage-safe column name.
///
/// The header is lowercased, every character outside `[a-z0-9]` and
/// whitespace is dropped, and whitespace runs become a single `_`.
/// Accented letters are dropped rather than folded, so `Preço/kg`
/// becomes `preokg`.
pub fn sanitize_column_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            pending_separator = true;
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !sanitized.is_empty() {
                sanitized.push('_');
            }
            pending_separator = false;
            sanitized.push(c);
        }
    }

    if sanitized.is_empty() {
        UNNAMED_COLUMN.to_string()
    } else {
        sanitized
    }
}

/// Sanitises every header and disambiguates collisions with `_2`, `_3`, ...
/// suffixes, in column order.
pub fn unique_column_names<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut taken = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .map(|header| {
            let base = sanitize_column_name(header.as_ref());
            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_column_name() {
        assert_eq!(sanitize_column_name("Produto"), "produto");
        assert_eq!(sanitize_column_name("  Data de Colheita  "), "data_de_colheita");
        assert_eq!(sanitize_column_name("Peso   (kg)"), "peso_kg");
        assert_eq!(sanitize_column_name("Preço/kg"), "preokg");
        assert_eq!(sanitize_column_name("area_total"), "areatotal");
        assert_eq!(sanitize_column_name("Lote 2"), "lote_2");
        assert_eq!(sanitize_column_name("#$%"), UNNAMED_COLUMN);
        assert_eq!(sanitize_column_name(""), UNNAMED_COLUMN);
        assert_eq!(sanitize_column_name("Água"), "gua");
    }

    #[test]
    fn test_unique_column_names() {
        let names = unique_column_names(&["Peso", "peso", "PESO!", "Outro", "#"]);
        assert_eq!(
            names,
            vec!["peso", "peso_2", "peso_3", "outro", UNNAMED_COLUMN]
        );
    }

    #[test]
    fn test_unique_column_names_suffix_already_taken() {
        let names = unique_column_names(&["a 2", "a", "a"]);
        assert_eq!(names, vec!["a_2", "a", "a_3"]);
    }
}
