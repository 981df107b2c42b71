use std::env;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

pub const DEFAULT_DATASET: &str = "akshatmehta98/amazon_reviews";
const ROWS_ENDPOINT: &str = "https://datasets-server.huggingface.co/rows";
const PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Row {row} has no usable '{field}' field")]
    MissingField { row: usize, field: String },
    #[error("Dataset {0} returned no rows")]
    Empty(String),
}

/// One labeled training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub label: String,
    pub text: String,
}

/// Which dataset to load and which columns hold label and text.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub name: String,
    pub config: String,
    pub split: String,
    pub label_field: String,
    pub text_field: String,
}

impl DatasetSpec {
    pub fn new(name: impl Into<String>, split: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            split: split.into(),
            ..Self::default()
        }
    }

    /// Directory-safe identifier used for the cache file.
    fn cache_key(&self) -> String {
        format!("{}--{}", self.name.replace('/', "__"), self.config)
    }
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATASET.to_string(),
            config: "default".to_string(),
            split: "train".to_string(),
            label_field: "labels".to_string(),
            text_field: "text".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row_idx: usize,
    row: Map<String, Value>,
}

/// Turns a dataset cell into a string. Class-label columns come back as
/// integers, so numbers and booleans are accepted too.
fn cell_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Extracts a [`LabeledExample`] from a raw row object.
pub fn example_from_row(
    row: &Map<String, Value>,
    index: usize,
    spec: &DatasetSpec,
) -> Result<LabeledExample, DatasetError> {
    let field = |name: &str| {
        row.get(name).and_then(cell_to_string).ok_or_else(|| DatasetError::MissingField {
            row: index,
            field: name.to_string(),
        })
    };
    Ok(LabeledExample {
        label: field(spec.label_field.as_str())?,
        text: field(spec.text_field.as_str())?,
    })
}

/// Reads examples from a JSON-lines file, one row object per line.
pub fn read_json_lines<P: AsRef<Path>>(path: P, spec: &DatasetSpec) -> Result<Vec<LabeledExample>, DatasetError> {
    let reader = BufReader::new(fs::File::open(path.as_ref())?);
    let mut examples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row: Map<String, Value> = serde_json::from_str(&line)?;
        examples.push(example_from_row(&row, index, spec)?);
    }
    Ok(examples)
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Fetches labeled datasets from the Hugging Face datasets server and keeps a
/// verified local copy.
#[derive(Clone)]
pub struct DatasetManager {
    cache_dir: PathBuf,
    endpoint: String,
    client: reqwest::Client,
    download_lock: Arc<Mutex<()>>,
}

impl DatasetManager {
    /// Creates a new DatasetManager with the default cache directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_cache_dir())
    }

    /// Returns the default dataset cache directory
    pub fn get_default_cache_dir() -> PathBuf {
        if let Ok(path) = env::var("COMMENTSENSE_CACHE") {
            return PathBuf::from(path).join("datasets");
        }
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("commentsense").join("datasets");
        }
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("commentsense").join("datasets");
        }
        env::temp_dir().join("commentsense").join("datasets")
    }

    pub fn new<P: AsRef<Path>>(cache_dir: P) -> io::Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            endpoint: ROWS_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Points the manager at a different rows endpoint (mirrors, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn get_dataset_path(&self, spec: &DatasetSpec) -> PathBuf {
        self.cache_dir.join(spec.cache_key()).join(format!("{}.jsonl", spec.split))
    }

    fn get_hash_path(&self, spec: &DatasetSpec) -> PathBuf {
        self.get_dataset_path(spec).with_extension("jsonl.sha256")
    }

    pub fn is_dataset_cached(&self, spec: &DatasetSpec) -> bool {
        let path = self.get_dataset_path(spec);
        log::info!("Cached dataset {:?} (exists: {})", path, path.exists());
        path.exists() && self.get_hash_path(spec).exists()
    }

    /// Checks the cached file against its recorded SHA-256.
    pub fn verify_cache(&self, spec: &DatasetSpec) -> Result<bool, DatasetError> {
        if !self.is_dataset_cached(spec) {
            return Ok(false);
        }
        let bytes = fs::read(self.get_dataset_path(spec))?;
        let expected = fs::read_to_string(self.get_hash_path(spec))?;
        let actual = sha256_hex(&bytes);
        log::info!("Calculated hash: {}", actual);
        log::info!("Expected hash:   {}", expected.trim());
        Ok(actual == expected.trim())
    }

    pub fn remove_cache(&self, spec: &DatasetSpec) -> Result<(), DatasetError> {
        for path in [self.get_dataset_path(spec), self.get_hash_path(spec)] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Returns every example of the split, downloading it when the cache is
    /// missing or fails verification.
    pub async fn load(&self, spec: &DatasetSpec) -> Result<Vec<LabeledExample>, DatasetError> {
        let _lock = self.download_lock.lock().await;
        if self.verify_cache(spec)? {
            log::info!("Using cached dataset {}", spec.name);
        } else {
            log::info!("Dataset {} not cached or invalid, downloading...", spec.name);
            self.remove_cache(spec)?;
            self.download(spec).await?;
        }
        read_json_lines(self.get_dataset_path(spec), spec)
    }

    async fn fetch_page(&self, spec: &DatasetSpec, offset: usize) -> Result<RowsPage, DatasetError> {
        let offset = offset.to_string();
        let length = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("dataset", spec.name.as_str()),
                ("config", spec.config.as_str()),
                ("split", spec.split.as_str()),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<RowsPage>().await?)
    }

    async fn download(&self, spec: &DatasetSpec) -> Result<(), DatasetError> {
        let mut buffer = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.fetch_page(spec, offset).await?;
            let fetched = page.rows.len();
            for entry in &page.rows {
                example_from_row(&entry.row, entry.row_idx, spec)?;
                serde_json::to_writer(&mut buffer, &entry.row)?;
                buffer.write_all(b"\n")?;
            }
            offset += fetched;
            log::info!("Fetched {} rows of {:?}", offset, page.num_rows_total);

            let done = match page.num_rows_total {
                Some(total) => offset >= total,
                None => fetched < PAGE_SIZE,
            };
            if fetched == 0 || done {
                break;
            }
        }
        if offset == 0 {
            return Err(DatasetError::Empty(spec.name.clone()));
        }

        let path = self.get_dataset_path(spec);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        log::info!("Writing {} bytes to {:?}", buffer.len(), path);
        fs::write(&path, &buffer)?;
        fs::write(self.get_hash_path(spec), sha256_hex(&buffer))?;
        Ok(())
    }
}
