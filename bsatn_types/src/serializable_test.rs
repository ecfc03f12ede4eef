#[cfg(test)]
mod test {
    use crate::codec::{BsatnReader, BsatnWriter};
    use crate::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
    use crate::sats::{serialize, AlgebraicType as T, AlgebraicValue as V};
    use crate::{DecodeError, Deser, Ser};
    use anyhow::Result;
    use ethnum::U256;

    #[test]
    fn typed_matches_type_walker() -> Result<()> {
        let typed: (Option<String>, Vec<u16>, Identity, Timestamp) = (
            Some(String::from("ann")),
            vec![1, 2],
            Identity::from(U256::from_words(7, 8)),
            Timestamp::from_micros_since_unix_epoch(-5),
        );

        let mut typed_w = BsatnWriter::new();
        typed.0.ser(&mut typed_w)?;
        typed.1.ser(&mut typed_w)?;
        typed.2.ser(&mut typed_w)?;
        typed.3.ser(&mut typed_w)?;

        let ty = T::tuple([
            T::option(T::String),
            T::array(T::U16),
            T::Identity,
            T::Timestamp,
        ]);
        let value = V::Tuple(vec![
            V::some(V::from("ann")),
            V::Array(vec![V::U16(1), V::U16(2)]),
            V::Identity(typed.2),
            V::Timestamp(typed.3),
        ]);
        let mut walker_w = BsatnWriter::new();
        serialize(&ty, &value, &mut walker_w)?;

        assert_eq!(typed_w.as_slice(), walker_w.as_slice());
        Ok(())
    }

    #[test]
    fn byte_vectors_are_byte_runs() -> Result<()> {
        let v: Vec<u8> = vec![1, 2, 3];
        let mut w = BsatnWriter::new();
        w.put_bytes(&v)?;
        assert_eq!(v.ser_solo()?, w.into_vec());
        Ok(())
    }

    #[test]
    fn deser_solo_rejects_trailing() -> Result<()> {
        let mut bytes = 5u32.ser_solo()?;
        assert_eq!(u32::deser_solo(&bytes)?, 5);

        bytes.push(0);
        match u32::deser_solo(&bytes) {
            Err(DecodeError::TrailingBytes { remaining: 1 }) => {}
            other => panic!("{:?}", other),
        }
        Ok(())
    }

    #[test]
    fn option_tags() -> Result<()> {
        assert_eq!(Some(7u8).ser_solo()?, vec![0, 7]);
        assert_eq!(None::<u8>.ser_solo()?, vec![1]);
        assert_eq!(Option::<u8>::deser_solo(&[1])?, None);

        match Option::<u8>::deser_solo(&[2]) {
            Err(DecodeError::InvalidDiscriminant {
                type_name,
                tag: 2,
                variant_count: 2,
            }) => assert_eq!(type_name, "Option"),
            other => panic!("{:?}", other),
        }

        let mut r = BsatnReader::new(&[0]);
        assert!(matches!(
            Option::<u8>::deser(&mut r),
            Err(DecodeError::OutOfBounds { .. })
        ));
        Ok(())
    }

    #[test]
    fn domain_wrappers() -> Result<()> {
        let cid = ConnectionId::from(0x0102u128);
        let bytes = cid.ser_solo()?;
        assert_eq!(&bytes[..2], &[0x02, 0x01]);
        assert_eq!(ConnectionId::deser_solo(&bytes)?, cid);

        let d = TimeDuration::from_millis(3);
        assert_eq!(TimeDuration::deser_solo(&d.ser_solo()?)?.micros(), 3_000);
        Ok(())
    }

    #[test]
    fn nested_element_errors_carry_index() -> Result<()> {
        let mut w = BsatnWriter::new();
        w.put_u32(2);
        w.put_string("ok")?;
        w.put_u32(99);
        let bytes = w.into_vec();

        let err = Vec::<String>::deser_solo(&bytes).unwrap_err();
        assert!(err.to_string().starts_with("element 1"), "{}", err);
        assert!(matches!(err.root_cause(), DecodeError::OutOfBounds { .. }));
        Ok(())
    }

    #[test]
    fn vec_counts_are_bounded() -> Result<()> {
        let err = Vec::<()>::deser_solo(&u32::MAX.to_le_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::TooManyEmptyElements { .. }));

        let mut w = BsatnWriter::new();
        w.put_u32(1_000_000);
        w.put_string("abc")?;
        let err = Vec::<String>::deser_solo(&w.into_vec()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::CountExceedsInput {
                count: 1_000_000,
                min_elem_len: 4,
                remaining: 7,
                ..
            }
        ));

        assert_eq!(Vec::<()>::deser_solo(&[2, 0, 0, 0])?, vec![(), ()]);
        Ok(())
    }
}
