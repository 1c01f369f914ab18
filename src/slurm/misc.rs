use std::collections::HashSet;

/// Counts the number of distinct values, e.g. node names listed for a partition
pub fn unique_values<'a, I>(values: I) -> usize
where
    I: Iterator<Item = &'a String>,
{
    values.collect::<HashSet<_>>().len()
}

/// Builds the `sinfo --Format` argument for the given field names. Each field is
/// unbounded in width (`:0`) and followed by a `|` separator.
pub fn format_string<'a, I, S>(fields: I) -> String
where
    I: Iterator<Item = &'a S>,
    S: ?Sized + AsRef<str> + 'a,
{
    let mut format = String::new();
    for field in fields {
        if !format.is_empty() {
            format.push(',');
        }

        // `|` does not appear in node names, partitions or GRES strings
        format.push_str(field.as_ref());
        format.push_str(":0|");
    }

    format
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_values() {
        let values = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(unique_values(values.iter()), 3);
        assert_eq!(unique_values(Vec::<String>::new().iter()), 0);
    }

    #[test]
    fn test_format_string() {
        assert_eq!(format_string(Vec::<&str>::new().iter()), "");
        assert_eq!(format_string(["NodeList"].iter()), "NodeList:0|");
        assert_eq!(
            format_string(["NodeList", "CPUs"].iter()),
            "NodeList:0|,CPUs:0|"
        );
    }
}
