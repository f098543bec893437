//! Digest algorithms and the tagged digest value

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256, Sha512};

use super::errors::{DigestError, DigestResult};

/// Supported digest algorithms.
///
/// The codes are the conventional multihash codes for the sha2 family,
/// so tagged digests stay readable to other multihash consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algo {
    /// SHA2-256 (default)
    Sha256,
    /// SHA2-512
    Sha512,
}

impl Algo {
    /// Returns the one-byte algorithm code used in the tagged form.
    pub fn code(self) -> u8 {
        match self {
            Algo::Sha256 => 0x12,
            Algo::Sha512 => 0x13,
        }
    }

    /// Returns the digest size in bytes for this algorithm.
    pub fn digest_len(self) -> usize {
        match self {
            Algo::Sha256 => 32,
            Algo::Sha512 => 64,
        }
    }

    /// Returns the algorithm name.
    pub fn name(self) -> &'static str {
        match self {
            Algo::Sha256 => "sha2-256",
            Algo::Sha512 => "sha2-512",
        }
    }

    /// Looks up an algorithm by its code byte.
    pub fn from_code(code: u8) -> DigestResult<Self> {
        match code {
            0x12 => Ok(Algo::Sha256),
            0x13 => Ok(Algo::Sha512),
            other => Err(DigestError::UnknownAlgo(other)),
        }
    }
}

impl Default for Algo {
    fn default() -> Self {
        Algo::Sha256
    }
}

impl fmt::Display for Algo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A self-describing content digest.
///
/// The tagged byte form is `[code, length, hash bytes...]`. The canonical
/// string form is the base64 URL-safe no-pad encoding of the tagged
/// bytes; it is the external handle for retrieval and the key of the
/// in-memory index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algo: Algo,
    bytes: Vec<u8>,
}

impl Digest {
    /// Creates a digest from raw hash bytes.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::LengthMismatch` if `bytes` is not exactly
    /// the algorithm's digest size.
    pub fn new(algo: Algo, bytes: Vec<u8>) -> DigestResult<Self> {
        if bytes.len() != algo.digest_len() {
            return Err(DigestError::LengthMismatch {
                algo: algo.name(),
                expected: algo.digest_len(),
                actual: bytes.len(),
            });
        }
        Ok(Self { algo, bytes })
    }

    /// Returns the digest algorithm.
    pub fn algo(&self) -> Algo {
        self.algo
    }

    /// Returns the raw hash bytes (untagged).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the tagged byte form: code, length, hash bytes.
    pub fn tagged_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.bytes.len());
        out.push(self.algo.code());
        out.push(self.bytes.len() as u8);
        out.extend_from_slice(&self.bytes);
        out
    }

    /// Total tagged length for a given algorithm.
    pub fn tagged_len(algo: Algo) -> usize {
        2 + algo.digest_len()
    }

    /// Parses a digest from its tagged byte form.
    ///
    /// # Errors
    ///
    /// Returns `Truncated` if the buffer is shorter than the header
    /// claims, `UnknownAlgo` for an unrecognized code byte, and
    /// `LengthMismatch` if the length byte disagrees with the algorithm.
    pub fn from_tagged_bytes(buf: &[u8]) -> DigestResult<Self> {
        if buf.len() < 2 {
            return Err(DigestError::Truncated {
                needed: 2,
                actual: buf.len(),
            });
        }
        let algo = Algo::from_code(buf[0])?;
        let claimed = buf[1] as usize;
        if claimed != algo.digest_len() {
            return Err(DigestError::LengthMismatch {
                algo: algo.name(),
                expected: algo.digest_len(),
                actual: claimed,
            });
        }
        if buf.len() < 2 + claimed {
            return Err(DigestError::Truncated {
                needed: 2 + claimed,
                actual: buf.len(),
            });
        }
        Ok(Self {
            algo,
            bytes: buf[2..2 + claimed].to_vec(),
        })
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", URL_SAFE_NO_PAD.encode(self.tagged_bytes()))
    }
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> DigestResult<Self> {
        let tagged = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| DigestError::InvalidEncoding(e.to_string()))?;
        let digest = Self::from_tagged_bytes(&tagged)?;
        // Reject trailing bytes after the tagged digest
        if tagged.len() != Digest::tagged_len(digest.algo) {
            return Err(DigestError::LengthMismatch {
                algo: digest.algo.name(),
                expected: Digest::tagged_len(digest.algo),
                actual: tagged.len(),
            });
        }
        Ok(digest)
    }
}

/// Content hashing interface.
///
/// The feed consumes hashing through this trait so hosts can substitute
/// their own implementation at construction time. Implementations must
/// be deterministic and size-stable for their declared algorithm.
pub trait Hasher {
    /// Returns the algorithm this hasher produces.
    fn algo(&self) -> Algo;

    /// Hashes `data` into a digest.
    fn hash(&self, data: &[u8]) -> Digest;
}

/// Default hasher over the sha2 family.
#[derive(Debug, Clone, Copy)]
pub struct StdHasher {
    algo: Algo,
}

impl StdHasher {
    /// Creates a hasher for the given algorithm.
    pub fn new(algo: Algo) -> Self {
        Self { algo }
    }
}

impl Default for StdHasher {
    fn default() -> Self {
        Self::new(Algo::default())
    }
}

impl Hasher for StdHasher {
    fn algo(&self) -> Algo {
        self.algo
    }

    fn hash(&self, data: &[u8]) -> Digest {
        let bytes = match self.algo {
            Algo::Sha256 => Sha256::digest(data).to_vec(),
            Algo::Sha512 => Sha512::digest(data).to_vec(),
        };
        Digest {
            algo: self.algo,
            bytes,
        }
    }
}
