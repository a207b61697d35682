//! Date and time utilities.

use std::{cmp::Ordering, fmt, marker::PhantomData, ops, time::Duration};

use derive_more::Debug;
use time::format_description::well_known::Rfc3339;

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time, typed by the `Of` marker describing what it denotes.
///
/// Kept with microsecond precision. [`Display`]ed as [RFC 3339].
///
/// [`Display`]: fmt::Display
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Returns the current date and time, truncated to microseconds.
    #[must_use]
    pub fn now() -> Self {
        let now = time::OffsetDateTime::now_utc();
        let excess = time::Duration::nanoseconds(i64::from(
            now.nanosecond() % 1_000,
        ));
        Self::from_inner(now - excess)
    }

    /// Creates a new [`DateTime`] from the provided Unix timestamp in
    /// seconds.
    ///
    /// [`None`] is returned if the timestamp is out of range.
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        time::OffsetDateTime::from_unix_timestamp(timestamp)
            .ok()
            .map(Self::from_inner)
    }

    /// Returns the Unix timestamp of this [`DateTime`] in seconds.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Checks whether this [`DateTime`] is reached at the provided `now`.
    ///
    /// The boundary itself counts as reached.
    #[must_use]
    pub fn is_reached_at<NowOf: ?Sized>(
        &self,
        now: DateTimeOf<NowOf>,
    ) -> bool {
        now.inner >= self.inner
    }

    /// Shifts this [`DateTime`] forward by the provided `duration`.
    ///
    /// [`None`] is returned if the result is out of the supported range.
    #[must_use]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let duration = time::Duration::try_from(duration).ok()?;
        self.inner.checked_add(duration).map(Self::from_inner)
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf::from_inner(self.inner)
    }

    /// Wraps the provided [`time::OffsetDateTime`], which is expected to be in
    /// UTC.
    fn from_inner(inner: time::OffsetDateTime) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> fmt::Display for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.format(&Rfc3339).map_err(|_| fmt::Error)?)
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_inner(self.inner + rhs)
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::from_inner(self.inner - rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::DateTime;

    #[test]
    fn boundary_is_reached() {
        let at = DateTime::from_unix_timestamp(1_700_000_000).unwrap();

        assert!(at.is_reached_at(at));
        assert!(at.is_reached_at(at + Duration::from_secs(1)));
        assert!(!at.is_reached_at(at - Duration::from_secs(1)));
    }

    #[test]
    fn checked_add_detects_overflow() {
        let at = DateTime::from_unix_timestamp(1_700_000_000).unwrap();

        assert_eq!(
            at.checked_add(Duration::from_secs(60)),
            Some(at + Duration::from_secs(60)),
        );
        assert_eq!(at.checked_add(Duration::MAX), None);
        assert_eq!(
            at.checked_add(Duration::from_secs(u64::from(u32::MAX) * 1_000)),
            None,
        );
    }

    #[test]
    fn displays_as_rfc3339() {
        let at = DateTime::from_unix_timestamp(1_700_000_000).unwrap();

        assert_eq!(at.to_string(), "2023-11-14T22:13:20Z");
        assert_eq!(
            (at + Duration::from_micros(1_500)).to_string(),
            "2023-11-14T22:13:20.0015Z",
        );
    }

    #[test]
    fn now_is_truncated_to_microseconds() {
        assert_eq!(DateTime::now().inner.nanosecond() % 1_000, 0);
    }
}
