use crate::Document;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load documents from a `.jsonl` file (one document per line) or a `.json` file
/// holding an array of documents or a single document.
pub fn load_corpus_file<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening corpus file {}", path.display()))?;
    let reader = BufReader::new(f);
    if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let doc: Document = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid document", path.display(), lineno + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }

    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", path.display()))?;
    match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(Into::into))
            .collect::<Result<Vec<Document>>>()
            .with_context(|| format!("invalid document in {}", path.display())),
        serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(json)?]),
        _ => bail!("{}: expected a JSON array or object", path.display()),
    }
}

/// Concatenate the documents of several files, in order.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Document>> {
    let mut corpus = Vec::new();
    for p in paths {
        let docs = load_corpus_file(p)?;
        tracing::debug!(path = %p.as_ref().display(), documents = docs.len(), "loaded corpus file");
        corpus.extend(docs);
    }
    Ok(corpus)
}
