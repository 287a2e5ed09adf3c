use sha2::{Digest, Sha512};
use std::io::{self, Read};

pub const HASH_LEN: usize = 64;
pub type HashResult = [u8; HASH_LEN];

/// A reader that digests everything passing through it.
pub struct StreamHasher<R: Read> {
    hasher: Sha512,
    input: R,
}

impl<R: Read> StreamHasher<R> {
    pub fn new(input: R) -> Self {
        StreamHasher {
            hasher: Sha512::default(),
            input,
        }
    }

    pub fn get_result(self) -> HashResult {
        let mut result = [0; HASH_LEN];
        result.copy_from_slice(self.hasher.finalize().as_slice());
        result
    }
}

impl<R: Read> Read for StreamHasher<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = self.input.read(buf)?;
        self.hasher.update(&buf[..size]);
        Ok(size)
    }
}

/// Drains `input` and returns its digest.
pub fn hash_reader<R: Read>(input: R) -> io::Result<HashResult> {
    let mut hasher = StreamHasher::new(input);
    io::copy(&mut hasher, &mut io::sink())?;
    Ok(hasher.get_result())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_matches_direct_digest() {
        let data = b"quarterly numbers\n1,2,3\n";
        let mut hasher = StreamHasher::new(&data[..]);
        let mut copied = Vec::new();
        hasher.read_to_end(&mut copied).unwrap();
        assert_eq!(copied, data);
        let expected = Sha512::digest(data);
        assert_eq!(&hasher.get_result()[..], expected.as_slice());
    }

    #[test]
    fn test_hash_reader_distinguishes_content() {
        let a = hash_reader(&b"alpha"[..]).unwrap();
        let b = hash_reader(&b"beta"[..]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, hash_reader(&b"alpha"[..]).unwrap());
    }
}
