use std::path::Path;

/// One label per line. A leading WordNet id such as `n02099601 ` is dropped.
pub fn parse_labels(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(' ') {
            Some((id, rest)) if is_synset_id(id) => rest.trim().to_string(),
            _ => line.to_string(),
        })
        .collect()
}

pub fn load_labels(
    path: impl AsRef<Path>,
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let contents = std::fs::read_to_string(path.as_ref())
        .map_err(|e| format!("reading labels {}: {}", path.as_ref().display(), e))?;
    let labels = parse_labels(&contents);
    if labels.is_empty() {
        return Err(format!("no labels in {}", path.as_ref().display()).into());
    }
    Ok(labels)
}

fn is_synset_id(token: &str) -> bool {
    token.len() == 9
        && token.starts_with('n')
        && token[1..].chars().all(|c| c.is_ascii_digit())
}
