// The JSON documents that carry a set of shares, and the recovery of one
// secret per document.
//
// A document looks like
//
//     { "keys": { "n": 4, "k": 3 },
//       "1": { "base": "10", "value": "4" },
//       "2": { "base": "2", "value": "111" }, ... }
//
// Only fields named "1" through "n" are shares; anything else is ignored.
// Share fields are kept raw until recovery, so a broken one only matters
// if the selection actually needs it.

use num::bigint::BigInt;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::shamir::{ParamBuilder, Point, Selection, Share};

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Keys {
    pub n: usize,
    pub k: usize,
}

#[derive(Debug, Deserialize)]
struct ShareFields {
    #[serde(deserialize_with = "int_or_decimal")]
    base: i64,
    value: String,
}

// Share files in the wild write the base both as 16 and as "16".  Range
// checks happen at decode time.
fn int_or_decimal<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Base {
        Int(i64),
        Text(String),
    }

    match Base::deserialize(deserializer)? {
        Base::Int(v) => Ok(v),
        Base::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    keys: Keys,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

// How to pick and check the shares of a document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub selection: Selection,
    pub verify_surplus: bool,
}

// A share field exactly as the document wrote it.
#[derive(Clone, Debug, PartialEq)]
pub struct ShareRecord {
    pub index: u32,
    pub raw: Value,
}

impl ShareRecord {
    pub fn share(&self) -> Result<Share> {
        let fields = ShareFields::deserialize(&self.raw).map_err(|source| Error::MalformedShare {
            index: self.index,
            source,
        })?;
        Ok(Share::new(self.index, fields.base, fields.value))
    }

    pub fn decode(&self) -> Result<Point> {
        let share = self.share()?;
        share.decode().map_err(|source| Error::Decode {
            index: self.index,
            source,
        })
    }
}

// One document's worth of work: the threshold, and every share present,
// ordered by index.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconstructionRequest {
    pub n: usize,
    pub k: usize,
    pub shares: Vec<ShareRecord>,
}

impl ReconstructionRequest {
    pub fn from_json(s: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_raw(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn from_raw(raw: RawDocument) -> Result<Self> {
        let n = raw.keys.n;
        let mut shares = Vec::new();
        for (field, value) in raw.fields {
            let index = match share_index(&field, n) {
                Some(index) => index,
                None => {
                    debug!(field = %field, "ignoring non-share field");
                    continue;
                }
            };
            shares.push(ShareRecord { index, raw: value });
        }
        shares.sort_by_key(|s| s.index);
        Ok(ReconstructionRequest {
            n,
            k: raw.keys.k,
            shares,
        })
    }

    // Recover the secret, decoding only the shares the selection needs.
    //
    // A share that is malformed or fails to decode sinks the whole request
    // if it is one of the K selected; a surplus one is skipped.
    pub fn recover(&self, options: &Options) -> Result<BigInt> {
        if self.k > self.n {
            return Err(Error::ThresholdTooLarge {
                k: self.k,
                n: self.n,
            });
        }
        let params = ParamBuilder::new(self.k)?
            .selection(options.selection)
            .verify_surplus(options.verify_surplus)
            .finalize();
        if self.shares.len() < params.k() {
            return Err(Error::InsufficientShares {
                have: self.shares.len(),
                need: params.k(),
            });
        }

        let mut ordered: Vec<&ShareRecord> = self.shares.iter().collect();
        if params.selection() == Selection::Highest {
            ordered.reverse();
        }
        let (required, surplus) = ordered.split_at(params.k());

        let mut points = Vec::with_capacity(ordered.len());
        for record in required {
            points.push(record.decode()?);
        }
        if options.verify_surplus {
            for record in surplus {
                match record.decode() {
                    Ok(point) => points.push(point),
                    Err(e) => warn!(index = record.index, error = %e, "skipping surplus share"),
                }
            }
        }
        params.reconstruct(&points)
    }
}

// Share fields are named by the plain decimal form of an index in 1..=n.
fn share_index(field: &str, n: usize) -> Option<u32> {
    let index: u32 = field.parse().ok()?;
    if index == 0 || index as usize > n || index.to_string() != field {
        return None;
    }
    Some(index)
}

// Recover one secret per file.  Each file stands alone: a failure is
// logged and reported in its slot, and the rest carry on.
pub fn recover_files<P: AsRef<Path>>(paths: &[P], options: &Options) -> Vec<Result<BigInt>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let result = ReconstructionRequest::from_path(path).and_then(|req| {
                info!(file = %path.display(), n = req.n, k = req.k, shares = req.shares.len(), "loaded");
                req.recover(options)
            });
            if let Err(e) = &result {
                error!(file = %path.display(), error = %e, "recovery failed");
            }
            result
        })
        .collect()
}
