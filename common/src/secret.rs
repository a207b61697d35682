//! Cryptographically secure random secrets.

use derive_more::{Display, Error};
use rand::{rngs::OsRng, RngCore};

/// Alphabet every generated secret is drawn from.
pub const ALPHANUMERIC: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Mask keeping the lowest 6 bits of a random byte.
const MASK: u8 = 0b0011_1111;

/// Generates a random alphanumeric string of `len` characters using the
/// operating system entropy source.
///
/// # Errors
///
/// If the entropy source cannot be read.
pub fn alphanumeric(len: usize) -> Result<String, Unavailable> {
    alphanumeric_with(&mut OsRng, len)
}

/// Generates a random alphanumeric string of `len` characters using the
/// provided `rng`.
///
/// Each random byte is masked to 6 bits and resampled whenever it doesn't
/// index into [`ALPHANUMERIC`], so every character is uniformly distributed.
///
/// # Errors
///
/// If the `rng` fails to produce bytes.
pub fn alphanumeric_with<R>(
    rng: &mut R,
    len: usize,
) -> Result<String, Unavailable>
where
    R: RngCore + ?Sized,
{
    let mut out = String::with_capacity(len);
    let mut buf = [0; 64];
    while out.len() < len {
        rng.try_fill_bytes(&mut buf).map_err(Unavailable)?;
        for b in buf {
            if out.len() == len {
                break;
            }
            if let Some(&c) = ALPHANUMERIC.get(usize::from(b & MASK)) {
                out.push(char::from(c));
            }
        }
    }
    Ok(out)
}

/// Error of the entropy source being unavailable.
#[derive(Debug, Display, Error)]
#[display("entropy source is unavailable: {_0}")]
pub struct Unavailable(rand::Error);

#[cfg(test)]
mod tests {
    use std::io;

    use rand::{Error, RngCore};

    use super::{alphanumeric, alphanumeric_with, ALPHANUMERIC};

    /// RNG failing on every request.
    struct Broken;

    impl RngCore for Broken {
        fn next_u32(&mut self) -> u32 {
            unreachable!()
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!()
        }

        fn fill_bytes(&mut self, _: &mut [u8]) {
            unreachable!()
        }

        fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), Error> {
            Err(Error::new(io::Error::other("no entropy")))
        }
    }

    /// RNG cycling through a fixed sequence of bytes.
    struct Scripted(Vec<u8>, usize);

    impl RngCore for Scripted {
        fn next_u32(&mut self) -> u32 {
            unreachable!()
        }

        fn next_u64(&mut self) -> u64 {
            unreachable!()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for b in dest {
                *b = self.0[self.1 % self.0.len()];
                self.1 += 1;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn generates_requested_length() {
        for len in [0, 1, 25, 64, 200] {
            let s = alphanumeric(len).unwrap();

            assert_eq!(s.len(), len);
            assert!(s.bytes().all(|b| ALPHANUMERIC.contains(&b)), "{s}");
        }
    }

    #[test]
    fn secrets_differ() {
        assert_ne!(alphanumeric(64).unwrap(), alphanumeric(64).unwrap());
    }

    #[test]
    fn rejects_out_of_alphabet_bytes() {
        // 62 and 63 are rejected, 127 masks to 63 and is rejected too.
        let mut rng = Scripted(vec![62, 63, 0, 127, 61], 0);

        assert_eq!(alphanumeric_with(&mut rng, 2).unwrap(), "a9");
    }

    #[test]
    fn fails_without_entropy() {
        let err = alphanumeric_with(&mut Broken, 64).unwrap_err();

        assert!(err.to_string().starts_with("entropy source is unavailable"));
    }
}
