#[cfg(test)]
mod test {
    use crate::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
    use crate::ParseHexError;
    use anyhow::Result;
    use std::time::{Duration, SystemTime};

    const IDENTITY_HEX: &str = "c200f60a2187046a058014b4a9a9f9b28398c08eec59ecaa0078d2f5a331f40c";

    #[test]
    fn identity_hex_is_big_endian() -> Result<()> {
        let id = Identity::from_hex(IDENTITY_HEX)?;
        assert_eq!(id.to_hex(), IDENTITY_HEX);
        assert_eq!(format!("{}", id), IDENTITY_HEX);
        assert_eq!(id.to_be_bytes()[0], 0xc2);
        assert_eq!(id.to_le_bytes()[0], 0x0c);
        assert_eq!(Identity::from_le_bytes(id.to_le_bytes()), id);

        let prefixed = format!("0x{}", IDENTITY_HEX);
        assert_eq!(Identity::from_hex(&prefixed)?, id);
        Ok(())
    }

    #[test]
    fn hex_parse_errors() {
        assert_eq!(
            Identity::from_hex("abc"),
            Err(ParseHexError::Length {
                expected: 64,
                got: 3
            })
        );
        assert_eq!(
            ConnectionId::from_hex("0000000000000000000000000000000g"),
            Err(ParseHexError::Digit { offset: 31 })
        );
        assert_eq!(
            ConnectionId::from_hex("+0000000000000000000000000000001"),
            Err(ParseHexError::Digit { offset: 0 })
        );
    }

    #[test]
    fn connection_id_zero() -> Result<()> {
        assert!(ConnectionId::ZERO.is_zero());
        assert_eq!(ConnectionId::ZERO.none_if_zero(), None);

        let cid = ConnectionId::from_hex("000000000000000000000000000001c8")?;
        assert_eq!(*cid, 456);
        assert_eq!(cid.none_if_zero(), Some(cid));
        Ok(())
    }

    #[test]
    fn random_connection_id_bytes() {
        for _ in 0..64 {
            let cid = ConnectionId::random();
            assert!(cid.to_be_bytes().iter().all(|b| *b < 0xff), "{:?}", cid);
        }
    }

    #[test]
    fn timestamp_system_time() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_micros(1_748_846_375_443_514);
        let ts = Timestamp::from_system_time(t);
        assert_eq!(
            ts.map(|ts| ts.micros_since_unix_epoch()),
            Some(1_748_846_375_443_514)
        );
        assert_eq!(ts.and_then(|ts| ts.to_system_time()), Some(t));

        let before = SystemTime::UNIX_EPOCH - Duration::from_micros(10);
        assert_eq!(
            Timestamp::from_system_time(before),
            Some(Timestamp::from_micros_since_unix_epoch(-10))
        );
        assert_eq!(
            Timestamp::from_micros_since_unix_epoch(-10).to_system_time(),
            Some(before)
        );

        assert!(Timestamp::now() > Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn time_duration_units() {
        let d = TimeDuration::from_millis(1_500);
        assert_eq!(d.micros(), 1_500_000);
        assert_eq!(d.millis(), 1_500);
        assert_eq!(d.to_duration(), Some(Duration::from_millis(1_500)));

        assert_eq!(TimeDuration::from_micros(-1_999).millis(), -1);
        assert_eq!(TimeDuration::from_micros(-1).to_duration(), None);
        assert_eq!(
            TimeDuration::from_duration(Duration::from_micros(127)),
            Some(TimeDuration::from_micros(127))
        );
        assert_eq!(TimeDuration::from_millis(i64::MAX).micros(), i64::MAX);
    }
}
