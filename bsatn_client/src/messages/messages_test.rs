#[cfg(test)]
mod test {
    use crate::messages::*;
    use bsatn_types::codec::BsatnReader;
    use bsatn_types::domain::{ConnectionId, Identity, TimeDuration, Timestamp};
    use bsatn_types::sats::{deserialize, AlgebraicValue as V};
    use bsatn_types::{DecodeError, Deser, Ser, UnsupportedFeature};
    use anyhow::Result;
    use bytes::Bytes;

    // Frames captured from a live server running the quickstart chat module.
    const IDENTITY_TOKEN_FRAME: &str = concat!(
        "00030cf431a3f5d27800aaec59ec8ec09883b2f9a9a9b41480056a0487210af600c28201000065794a306558",
        "41694f694a4b563151694c434a68624763694f694a46557a49314e694a392e65794a6f5a5868666157526c62",
        "6e527064486b694f694a6a4d6a41775a6a5977595449784f4463774e445a684d4455344d444530596a52684f",
        "5745355a6a6c694d6a677a4f54686a4d44686c5a574d314f57566a595745774d4463345a444a6d4e57457a4d",
        "7a466d4e44426a4969776963335669496a6f694d6d56684d5449305a4441745a444935597930305a4759774c",
        "546b774f4451745a4745324d6a4e6a4e3259304e5756694969776961584e7a496a6f696247396a5957786f62",
        "334e30496977695958566b496a7062496e4e7759574e6c64476c745a575269496c3073496d6c68644349364d",
        "5463304f44417a4e4441324f4377695a586877496a70756457787366512e5a4a4b6e734f633854736e547033",
        "584a576473535a64755379315876366f2d55585f494672334a4f7a6e7072723970424f68497549426e6b4c5a",
        "5f6c6f34777351306863523667624476446672444857686a63664167daa835213b727f77283d0ff5d51884c1",
    );

    const TRANSACTION_UPDATE_FRAME: &str = concat!(
        "000100000000003a9cf906913606005cff1d57959caf63f884313a96bed024c07d0f8e6c713b946e8ca6ebe5",
        "6300c2efb64501efd2c807106ff13e25b33a19080000007365745f6e616d65030000001c0000001800000053",
        "65746e616d652063616c6c65642077697468207468697300000000b8b023000000000000000000000000007f",
        "00000000000000",
    );

    fn unhex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn captured_identity_token() -> Result<()> {
        let frame = unhex(IDENTITY_TOKEN_FRAME);
        assert_eq!(frame.len(), 440);

        let token = match decode_server_frame(&frame)? {
            ServerMessage::IdentityToken(token) => token,
            other => panic!("{:?}", other),
        };
        assert_eq!(
            token.identity.to_hex(),
            "c200f60a2187046a058014b4a9a9f9b28398c08eec59ecaa0078d2f5a331f40c"
        );
        assert_eq!(token.token.len(), 386);
        assert!(token.token.starts_with("eyJ0eXAiOiJKV1Qi"));
        assert_eq!(token.token.split('.').count(), 3);

        // The last 16 bytes of the frame, little-endian.
        assert_eq!(
            *token.connection_id,
            257_226_890_101_086_714_000_154_576_191_229_372_634
        );
        assert_eq!(token.connection_id.to_hex(), "c18418d5f50f3d28777f723b2135a8da");
        Ok(())
    }

    #[test]
    fn captured_transaction_update() -> Result<()> {
        let frame = unhex(TRANSACTION_UPDATE_FRAME);
        assert_eq!(frame.len(), 139);

        let tx = match decode_server_frame(&frame)? {
            ServerMessage::TransactionUpdate(tx) => tx,
            other => panic!("{:?}", other),
        };
        assert_eq!(tx.status, UpdateStatus::Committed(DatabaseUpdate::default()));
        assert_eq!(
            tx.timestamp,
            Timestamp::from_micros_since_unix_epoch(1_748_846_375_443_514)
        );
        assert_eq!(
            tx.caller_identity,
            Identity::from_hex("c20063e5eba68c6e943b716c8e0f7dc024d0be963a3184f863af9c95571dff5c")?
        );
        assert_eq!(
            tx.caller_connection_id,
            ConnectionId::from_hex("193ab3253ef16f1007c8d2ef0145b6ef")?
        );
        assert_eq!(tx.reducer_call.reducer_name, "set_name");
        assert_eq!(tx.reducer_call.reducer_id, 3);
        assert_eq!(tx.reducer_call.request_id, 0);
        assert_eq!(
            String::deser_solo(&tx.reducer_call.args)?,
            "Setname called with this"
        );
        assert_eq!(*tx.energy_quanta_used, 2_339_000);
        assert_eq!(tx.total_host_execution_duration, TimeDuration::from_micros(127));
        Ok(())
    }

    #[test]
    fn captured_frames_reencode_exactly() -> Result<()> {
        for hex in [IDENTITY_TOKEN_FRAME, TRANSACTION_UPDATE_FRAME] {
            let frame = unhex(hex);
            let msg = decode_server_frame(&frame)?;
            assert_eq!(&encode_server_frame(&msg)?[..], &frame[..]);
        }
        Ok(())
    }

    #[test]
    fn generic_decoding_agrees_with_typed() -> Result<()> {
        let schema = ProtocolSchema::new();

        let frame = unhex(IDENTITY_TOKEN_FRAME);
        let typed = match decode_server_frame(&frame)? {
            ServerMessage::IdentityToken(token) => token,
            other => panic!("{:?}", other),
        };
        let mut r = BsatnReader::new(&frame[1..]);
        let generic = deserialize(&schema.server_message, &mut r)?;
        assert!(r.is_exhausted());
        let sum = generic.as_sum().unwrap();
        assert_eq!(sum.tag, 3);
        assert_eq!(sum.value.field("identity"), Some(&V::Identity(typed.identity)));
        assert_eq!(sum.value.field("token").and_then(V::as_str), Some(&typed.token[..]));
        assert_eq!(
            sum.value.field("connection_id"),
            Some(&V::ConnectionId(typed.connection_id))
        );

        let frame = unhex(TRANSACTION_UPDATE_FRAME);
        let mut r = BsatnReader::new(&frame[1..]);
        let generic = deserialize(&schema.server_message, &mut r)?;
        assert!(r.is_exhausted());
        let tx = &generic.as_sum().unwrap().value;
        let call = tx.field("reducer_call").unwrap();
        assert_eq!(call.field("reducer_name").and_then(V::as_str), Some("set_name"));
        assert_eq!(
            tx.field("energy_quanta_used").and_then(|e| e.field("quanta")),
            Some(&V::U128(2_339_000))
        );
        Ok(())
    }

    #[test]
    fn compressed_frames_are_rejected() {
        let mut frame = unhex(IDENTITY_TOKEN_FRAME);

        frame[0] = 1;
        assert!(matches!(
            decode_server_frame(&frame),
            Err(DecodeError::Unsupported(UnsupportedFeature::BrotliCompression))
        ));
        frame[0] = 2;
        assert!(matches!(
            decode_server_frame(&frame),
            Err(DecodeError::Unsupported(UnsupportedFeature::GzipCompression))
        ));
        frame[0] = 3;
        assert!(matches!(
            decode_server_frame(&frame),
            Err(DecodeError::InvalidDiscriminant { tag: 3, .. })
        ));
        assert!(matches!(
            decode_server_frame(&[]),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn server_message_tags() {
        assert!(matches!(
            decode_server_frame(&[0, 2, 0, 0, 0, 0]),
            Err(DecodeError::Unsupported(
                UnsupportedFeature::TransactionUpdateLight
            ))
        ));
        assert!(matches!(
            decode_server_frame(&[0, 4]),
            Err(DecodeError::InvalidDiscriminant {
                tag: 4,
                variant_count: 4,
                ..
            })
        ));
    }

    #[test]
    fn truncated_and_trailing_frames() {
        let frame = unhex(IDENTITY_TOKEN_FRAME);

        let err = decode_server_frame(&frame[..100]).unwrap_err();
        assert!(matches!(err.root_cause(), DecodeError::OutOfBounds { .. }));

        let mut longer = frame.clone();
        longer.push(0);
        assert!(matches!(
            decode_server_frame(&longer),
            Err(DecodeError::TrailingBytes { remaining: 1 })
        ));
    }

    #[test]
    fn call_reducer_layout() -> Result<()> {
        let msg = ClientMessage::CallReducer(CallReducer {
            reducer: String::from("set_name"),
            args: String::from("ann").ser_solo()?,
            request_id: 7,
            flags: CallReducerFlags::NO_SUCCESS_NOTIFY,
        });
        let frame = encode_client_frame(&msg)?;

        let mut expected = vec![0u8];
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(b"set_name");
        expected.extend_from_slice(&7u32.to_le_bytes());
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(b"ann");
        expected.extend_from_slice(&7u32.to_le_bytes());
        expected.push(1);
        assert_eq!(&frame[..], &expected[..]);

        assert_eq!(decode_client_frame(&frame)?, msg);

        // Flag bytes without a name still pass through.
        let mut odd = frame.to_vec();
        *odd.last_mut().unwrap() = 0x82;
        match decode_client_frame(&odd)? {
            ClientMessage::CallReducer(call) => {
                assert_eq!(call.flags, CallReducerFlags(0x82));
                assert_eq!(&encode_client_frame(&ClientMessage::CallReducer(call))?[..], &odd[..]);
            }
            other => panic!("{:?}", other),
        }
        Ok(())
    }

    #[test]
    fn subscribe_layout() -> Result<()> {
        let msg = ClientMessage::Subscribe(Subscribe {
            query_strings: vec![String::from("SELECT * FROM user"), String::new()],
            request_id: 2,
        });
        let frame = encode_client_frame(&msg)?;

        let mut expected = vec![1u8];
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&18u32.to_le_bytes());
        expected.extend_from_slice(b"SELECT * FROM user");
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&2u32.to_le_bytes());
        assert_eq!(&frame[..], &expected[..]);

        assert_eq!(decode_client_frame(&frame)?, msg);
        Ok(())
    }

    #[test]
    fn compressed_query_updates_keep_stream_aligned() -> Result<()> {
        let rows = BsatnRowList::new(RowSizeHint::FixedSize(1), vec![1u8, 2]);
        let update = DatabaseUpdate {
            tables: vec![
                TableUpdate {
                    table_id: 1,
                    table_name: String::from("zipped"),
                    num_rows: 3,
                    updates: vec![CompressableQueryUpdate::Gzip(Bytes::from_static(b"\x1f\x8b"))],
                },
                TableUpdate {
                    table_id: 2,
                    table_name: String::from("plain"),
                    num_rows: 2,
                    updates: vec![CompressableQueryUpdate::Uncompressed(QueryUpdate {
                        deletes: BsatnRowList::default(),
                        inserts: rows,
                    })],
                },
            ],
        };
        let msg = ServerMessage::InitialSubscription(InitialSubscription {
            database_update: update,
            request_id: 9,
            total_host_execution_duration: TimeDuration::from_micros(5),
        });

        let frame = encode_server_frame(&msg)?;
        assert_eq!(decode_server_frame(&frame)?, msg);
        Ok(())
    }

    #[test]
    fn row_slices_follow_hint() {
        let fixed = BsatnRowList::new(RowSizeHint::FixedSize(4), vec![0u8; 8]);
        assert_eq!(fixed.row_count_hint(), Some(2));
        assert_eq!(fixed.row_slices().map(|s| s.len()), Some(2));

        let ragged = BsatnRowList::new(RowSizeHint::FixedSize(3), vec![0u8; 8]);
        assert_eq!(ragged.row_slices(), None);

        let data = vec![1u8, 1, 1, 2, 2, 3, 3];
        let offsets = BsatnRowList::new(RowSizeHint::RowOffsets(vec![0, 3, 5]), data.clone());
        assert_eq!(offsets.row_count_hint(), Some(3));
        assert_eq!(
            offsets.row_slices(),
            Some(vec![&data[0..3], &data[3..5], &data[5..7]])
        );

        let skips_start = BsatnRowList::new(RowSizeHint::RowOffsets(vec![1]), data.clone());
        assert_eq!(skips_start.row_slices(), None);
        let descending = BsatnRowList::new(RowSizeHint::RowOffsets(vec![0, 5, 3]), data);
        assert_eq!(descending.row_slices(), None);

        assert_eq!(BsatnRowList::default().row_slices(), Some(vec![]));
    }
}
