#![allow(missing_docs)]
use station_core::broadcast::decode_with_pad;
use station_core::codec;
use station_core::crypto::{otp_decrypt, otp_encrypt};
use station_core::MissionError;

#[test]
fn test_encryption_decryption_roundtrip() {
    let cases = [
        ("0805121215", "1234567890"),
        ("", ""),
        ("9999", "9999"),
        ("0000000000", "98765432109876543210"),
        ("2600190012", "00000000000000000000000000000000000000000000000000"),
    ];
    for (message, pad) in cases {
        let cipher = otp_encrypt(message, pad).expect("encrypt should succeed");
        assert_eq!(cipher.len(), message.len());
        let plain = otp_decrypt(&cipher, pad).expect("decrypt should succeed");
        assert_eq!(plain, message);
    }
}

#[test]
fn test_known_vector() {
    // HELLO with the first ten digits of the row "12345 67890".
    let message = codec::encode("HELLO");
    assert_eq!(message, "0805121215");

    let cipher = otp_encrypt(&message, "1234567890").expect("encrypt should succeed");
    assert_eq!(cipher, "1039688005");
    assert_eq!(otp_decrypt(&cipher, "1234567890").unwrap(), message);
}

#[test]
fn test_decrypt_wraps_negative_results() {
    assert_eq!(otp_decrypt("0", "9").unwrap(), "1");
    assert_eq!(otp_decrypt("05", "78").unwrap(), "37");
}

#[test]
fn test_pad_too_short_for_every_shorter_pad() {
    let message = "31415926";
    for message_len in 1..=message.len() {
        for pad_len in 0..message_len {
            let m = &message[..message_len];
            let p = &"27182818"[..pad_len];
            let err = otp_encrypt(m, p).unwrap_err();
            assert!(
                matches!(err, MissionError::PadTooShort { pad, message } if pad == pad_len && message == message_len),
                "unexpected error {err:?}"
            );
            assert!(matches!(
                otp_decrypt(m, p),
                Err(MissionError::PadTooShort { .. })
            ));
        }
    }
}

#[test]
fn test_longer_pad_leaves_suffix_untouched() {
    let pad = "12345678901234567890";
    let cipher = otp_encrypt("0000", pad).unwrap();
    assert_eq!(cipher, "1234");
    // The cipher takes no ownership of the pad; the suffix is the caller's to keep.
    assert_eq!(&pad[4..], "5678901234567890");
}

#[test]
fn test_non_digits_are_rejected() {
    let err = otp_encrypt("12a4", "0000").unwrap_err();
    assert!(matches!(
        err,
        MissionError::InvalidDigit { position: 2, found: 'a' }
    ));
    assert!(matches!(
        otp_decrypt("1234", "12 4"),
        Err(MissionError::InvalidDigit { position: 2, found: ' ' })
    ));
}

#[test]
fn test_codec_covers_every_code() {
    for n in 0..=26u8 {
        let code = format!("{n:02}");
        let ch = codec::decode(&code).chars().next().unwrap();
        let expected = if n == 0 { ' ' } else { char::from(b'A' + n - 1) };
        assert_eq!(ch, expected);
        assert_eq!(codec::encode(&ch.to_string()), code);
    }
    for n in 27..=99u8 {
        assert_eq!(codec::decode(&format!("{n:02}")), codec::UNKNOWN_CHAR.to_string());
    }
}

#[test]
fn test_codec_drops_incomplete_trailing_pair() {
    assert_eq!(codec::decode("08051"), "HE");
    assert_eq!(codec::decode("0"), "");
    assert_eq!(codec::decode("0x26"), "?Z");
}

#[test]
fn test_encode_maps_unknown_characters_to_space_code() {
    assert_eq!(codec::encode("A-B"), "010002");
    assert_eq!(codec::encode("HI THERE"), "0809002008051805");
}

#[test]
fn test_sanitize_message() {
    assert_eq!(codec::sanitize_message("Meet at 9pm, dock 4!"), "MEET AT PM DOCK ");
    let long = "abcdefghijklmnopqrstuvwxyzabc";
    assert_eq!(codec::sanitize_message(long).len(), codec::MAX_MESSAGE_CHARS);
    assert_eq!(codec::sanitize_message("Ærø"), "R");
}

#[test]
fn test_decode_with_pad() {
    let pad = "1234567890";
    let cipher = otp_encrypt(&codec::encode("HELLO"), pad).unwrap();
    assert_eq!(decode_with_pad(&cipher, pad), "HELLO");

    // Only the overlapping length is used, and the odd trailing digit is dropped.
    assert_eq!(decode_with_pad(&cipher, "123"), "H");
    assert_eq!(decode_with_pad("99", "00"), "?");
    assert_eq!(decode_with_pad("", pad), "");
}
