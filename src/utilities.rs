//! Splits `haystack` at the first occurrence of `needle`, returning None if no needle was found
pub fn split_first(haystack: &[u8], needle: u8) -> Option<(&[u8], &[u8])> {
    let index = haystack.iter().position(|&c| c == needle)?;

    Some((&haystack[..index], &haystack[index + 1..]))
}
