use serde::{Deserialize, Serialize};

/// One of the three fixed counters of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Positive,
    Negative,
    Neutral,
}

impl Bucket {
    /// Exact, case-sensitive match; any other label is [`Bucket::Neutral`].
    pub fn for_label(label: &str) -> Self {
        match label {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

/// Per-request sentiment tally, serialized verbatim as the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    /// Labels that routed to `neutral` without being "neutral".
    #[serde(skip)]
    unrecognized: u64,
}

impl SentimentCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one label and returns the bucket it landed in.
    pub fn record(&mut self, label: &str) -> Bucket {
        let bucket = Bucket::for_label(label);
        match bucket {
            Bucket::Positive => self.positive += 1,
            Bucket::Negative => self.negative += 1,
            Bucket::Neutral => {
                self.neutral += 1;
                if label != "neutral" {
                    self.unrecognized += 1;
                }
            }
        }
        bucket
    }

    pub fn total(&self) -> u64 {
        self.positive + self.negative + self.neutral
    }

    /// How many of the neutral counts came from labels outside the known set.
    pub fn unrecognized(&self) -> u64 {
        self.unrecognized
    }
}

impl<S: AsRef<str>> FromIterator<S> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = S>>(labels: I) -> Self {
        let mut counts = Self::new();
        for label in labels {
            counts.record(label.as_ref());
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_labels() {
        let counts: SentimentCounts = ["positive", "negative", "positive", "neutral"].into_iter().collect();
        assert_eq!((counts.positive, counts.negative, counts.neutral), (2, 1, 1));
        assert_eq!(counts.unrecognized(), 0);
    }

    #[test]
    fn test_unknown_labels_fall_back_to_neutral() {
        let counts: SentimentCounts = ["Positive", "mixed", "", "negative "].into_iter().collect();
        assert_eq!(counts.neutral, 4);
        assert_eq!(counts.unrecognized(), 4);
    }

    #[test]
    fn test_serializes_three_fixed_keys() {
        let json = serde_json::to_string(&SentimentCounts::new()).unwrap();
        assert_eq!(json, r#"{"positive":0,"negative":0,"neutral":0}"#);
    }

    proptest! {
        #[test]
        fn total_equals_number_of_labels(labels in proptest::collection::vec(
            prop_oneof![Just("positive".to_string()), Just("negative".to_string()), "[a-z]{0,8}"],
            0..64,
        )) {
            let counts: SentimentCounts = labels.iter().collect();
            prop_assert_eq!(counts.total(), labels.len() as u64);
        }

        #[test]
        fn order_does_not_matter(mut labels in proptest::collection::vec("(positive|negative|[a-z]{1,3})", 0..32)) {
            let forward: SentimentCounts = labels.iter().collect();
            labels.reverse();
            let backward: SentimentCounts = labels.iter().collect();
            prop_assert_eq!(forward, backward);
        }
    }
}
