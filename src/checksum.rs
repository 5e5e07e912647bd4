use std::{fmt::Display, path::Path};

use sha2::{digest::{FixedOutput, Update}, Digest, Sha512};
use tokio::{fs::File, io::{AsyncReadExt, BufReader}};

use crate::error::{ErrorKind, Result};

#[derive(Debug, PartialEq)]
pub enum Checksum {
    Sha512([u8; 64])
}

impl From<[u8; 64]> for Checksum {
    fn from(value: [u8; 64]) -> Self {
        Self::Sha512(value)
    }
}

impl Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Checksum::Sha512(v) => f.write_str(&hex::encode(v)),
        }
    }
}

impl Checksum {
    pub fn create_hasher(&self) -> Box<dyn Hasher> {
        match self {
            Checksum::Sha512(_) => Box::new(Sha512Hasher::new()),
        }
    }

    pub async fn sha512_of_file(path: &Path) -> Result<Checksum> {
        hash_file(path, Box::new(Sha512Hasher::new())).await
    }

    /// Hashes `path` with the same algorithm as `self` and fails if the digests differ.
    pub async fn verify_file(&self, path: &Path) -> Result<()> {
        let hash = hash_file(path, self.create_hasher()).await?;

        if *self != hash {
            return Err(ErrorKind::Checksum {
                path: path.to_path_buf(),
                expected: self.to_string(),
                hash: hash.to_string(),
            })
        }

        Ok(())
    }
}

async fn hash_file(path: &Path, mut hasher: Box<dyn Hasher>) -> Result<Checksum> {
    let file = File::open(path).await.map_err(ErrorKind::at(path))?;
    let mut reader = BufReader::new(file);
    let mut buf = vec![0u8; 1024*64];

    loop {
        let read = reader.read(&mut buf).await.map_err(ErrorKind::at(path))?;
        if read == 0 {
            break
        }

        hasher.consume(&buf[..read]);
    }

    Ok(hasher.compute())
}

pub trait Hasher : Sync + Send {
    fn consume(&mut self, data: &[u8]);
    fn compute(self: Box<Self>) -> Checksum;
}

pub struct Sha512Hasher {
    hasher: Sha512
}

impl Sha512Hasher {
    pub fn new() -> Self {
        Self {
            hasher: sha2::Sha512::new()
        }
    }
}

impl Hasher for Sha512Hasher {
    fn consume(&mut self, data: &[u8]) {
        Update::update(&mut self.hasher, data)
    }

    fn compute(self: Box<Self>) -> Checksum {
        Checksum::Sha512(self.hasher.finalize_fixed().into())
    }
}
