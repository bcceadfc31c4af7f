//! Builds `.osr` files from a stored score and its raw replay frames.
//!
//! Layout (little-endian): mode `i8`, format version `i32`, beatmap checksum,
//! player name and verification hash as strings, the six hit counts as `i16`,
//! score `i32`, max combo `i16`, perfect flag `u8`, mods `i32`, an empty
//! life-bar string, timestamp `i64`, raw length `i32`, the raw bytes, and the
//! online score id `i64`.

use crate::models::scores::Score;
use crate::models::users::User;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

pub const REPLAY_VERSION: i32 = 20210520;

const STRING_PRESENT: u8 = 0x0B;
const STRING_EMPTY: u8 = 0x00;

/// Encodes a full replay file. Deterministic in its inputs.
pub fn encode(score: &Score, user: &User, raw_replay: &[u8]) -> io::Result<Vec<u8>> {
    let mode = i8::try_from(score.mode).map_err(invalid_input)?;
    let raw_length = i32::try_from(raw_replay.len()).map_err(invalid_input)?;

    let mut buffer = Vec::with_capacity(raw_replay.len() + 128);

    buffer.write_i8(mode)?;
    buffer.write_i32::<LittleEndian>(REPLAY_VERSION)?;
    write_string(&mut buffer, &score.map_md5)?;
    write_string(&mut buffer, &user.username)?;
    write_string(&mut buffer, &verification_hash(score, &user.username))?;

    for count in [
        score.count_300,
        score.count_100,
        score.count_50,
        score.count_geki,
        score.count_katu,
        score.count_miss,
    ] {
        buffer.write_i16::<LittleEndian>(count)?;
    }

    buffer.write_i32::<LittleEndian>(score.score)?;
    buffer.write_i16::<LittleEndian>(score.max_combo)?;
    buffer.write_u8(u8::from(score.perfect))?;
    buffer.write_i32::<LittleEndian>(score.mods)?;

    // Life-bar graph.
    write_string(&mut buffer, "")?;

    buffer.write_i64::<LittleEndian>(score.submitted)?;
    buffer.write_i32::<LittleEndian>(raw_length)?;
    buffer.write_all(raw_replay)?;
    buffer.write_i64::<LittleEndian>(score.id)?;

    Ok(buffer)
}

/// Lowercase hex MD5 the osu! client checks replays against.
pub fn verification_hash(score: &Score, username: &str) -> String {
    let perfect = if score.perfect { "True" } else { "False" };

    let input = format!(
        "{}o{}o{}o{}t{}a{}r{}e{}y{}o{}u{}{}True",
        i32::from(score.count_100) + i32::from(score.count_300),
        score.count_50,
        score.count_geki,
        score.count_katu,
        score.count_miss,
        score.map_md5,
        score.max_combo,
        perfect,
        username,
        score.score,
        score.rank,
        score.mods,
    );

    format!("{:x}", md5::compute(input))
}

pub fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    if value.is_empty() {
        return writer.write_u8(STRING_EMPTY);
    }

    writer.write_u8(STRING_PRESENT)?;
    write_uleb128(writer, value.len() as u64)?;
    writer.write_all(value.as_bytes())
}

pub fn write_uleb128<W: Write>(writer: &mut W, mut value: u64) -> io::Result<()> {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;

        if value == 0 {
            return writer.write_u8(byte);
        }

        writer.write_u8(byte | 0x80)?;
    }
}

fn invalid_input<E>(why: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidInput, why)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ReadBytesExt;
    use std::io::{Cursor, Read};

    fn score() -> Score {
        Score {
            id: 9_000_001,
            user_id: 3,
            map_md5: String::from("1cf5b2c2edfafd055536d2cefcb89c0e"),
            score: 7_891_234,
            pp: 312.5,
            accuracy: 98.76,
            count_300: 812,
            count_100: 14,
            count_50: 1,
            count_geki: 190,
            count_katu: 9,
            count_miss: 2,
            max_combo: 1104,
            perfect: false,
            rank: String::from("A"),
            mods: 72,
            mode: 0,
            gamemode: 0,
            status: 3,
            submitted: 1_700_000_000,
        }
    }

    fn user() -> User {
        User {
            id: 3,
            username: String::from("Jeglerjeg"),
            country: String::from("NO"),
            privileges: 6,
        }
    }

    fn read_string(cursor: &mut Cursor<&[u8]>) -> String {
        match cursor.read_u8().unwrap() {
            STRING_EMPTY => String::new(),
            STRING_PRESENT => {
                let mut length = 0u64;
                let mut shift = 0;
                loop {
                    let byte = cursor.read_u8().unwrap();
                    length |= u64::from(byte & 0x7F) << shift;
                    if byte & 0x80 == 0 {
                        break;
                    }
                    shift += 7;
                }
                let mut bytes = vec![0; length as usize];
                cursor.read_exact(&mut bytes).unwrap();
                String::from_utf8(bytes).unwrap()
            }
            other => panic!("unexpected string marker {other:#x}"),
        }
    }

    #[test]
    fn output_is_deterministic() {
        let raw = b"lzma frames";

        assert_eq!(
            encode(&score(), &user(), raw).unwrap(),
            encode(&score(), &user(), raw).unwrap()
        );
    }

    #[test]
    fn length_is_fixed_fields_plus_strings_plus_raw() {
        let raw = vec![7u8; 300];
        let encoded = encode(&score(), &user(), &raw).unwrap();

        // Each non-empty string here is short enough for a one-byte length.
        let string = |s: &str| 2 + s.len();
        let expected = 1
            + 4
            + string(&score().map_md5)
            + string("Jeglerjeg")
            + string(&verification_hash(&score(), "Jeglerjeg"))
            + 6 * 2
            + 4
            + 2
            + 1
            + 4
            + 1
            + 8
            + 4
            + raw.len()
            + 8;

        assert_eq!(encoded.len(), expected);
    }

    #[test]
    fn fields_decode_in_order() {
        let raw = b"\x5d\x00\x00\x20\x00frames";
        let encoded = encode(&score(), &user(), raw).unwrap();
        let mut cursor = Cursor::new(encoded.as_slice());

        assert_eq!(cursor.read_i8().unwrap(), 0);
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), REPLAY_VERSION);
        assert_eq!(read_string(&mut cursor), score().map_md5);
        assert_eq!(read_string(&mut cursor), "Jeglerjeg");
        assert_eq!(
            read_string(&mut cursor),
            verification_hash(&score(), "Jeglerjeg")
        );

        let counts: Vec<i16> = (0..6)
            .map(|_| cursor.read_i16::<LittleEndian>().unwrap())
            .collect();
        assert_eq!(counts, vec![812, 14, 1, 190, 9, 2]);

        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 7_891_234);
        assert_eq!(cursor.read_i16::<LittleEndian>().unwrap(), 1104);
        assert_eq!(cursor.read_u8().unwrap(), 0);
        assert_eq!(cursor.read_i32::<LittleEndian>().unwrap(), 72);
        assert_eq!(read_string(&mut cursor), "");
        assert_eq!(cursor.read_i64::<LittleEndian>().unwrap(), 1_700_000_000);

        let length = cursor.read_i32::<LittleEndian>().unwrap();
        assert_eq!(length as usize, raw.len());
        let mut frames = vec![0; raw.len()];
        cursor.read_exact(&mut frames).unwrap();
        assert_eq!(frames, raw);

        assert_eq!(cursor.read_i64::<LittleEndian>().unwrap(), 9_000_001);
        assert_eq!(cursor.position() as usize, encoded.len());
    }

    #[test]
    fn hash_matches_the_client_layout() {
        let expected = md5::compute(
            "826o1o190o9t2a1cf5b2c2edfafd055536d2cefcb89c0er1104eFalseyJeglerjego7891234uA72True",
        );

        assert_eq!(
            verification_hash(&score(), "Jeglerjeg"),
            format!("{expected:x}")
        );
    }

    #[test]
    fn hash_tracks_the_counts() {
        let original = verification_hash(&score(), "Jeglerjeg");

        let mut swapped = score();
        swapped.count_300 = score().count_100;
        swapped.count_100 = score().count_300;
        // 300s and 100s are summed, so swapping them alone keeps the hash.
        assert_eq!(verification_hash(&swapped, "Jeglerjeg"), original);

        let mut more_300s = score();
        more_300s.count_300 += 1;
        assert_ne!(verification_hash(&more_300s, "Jeglerjeg"), original);

        let mut missed = score();
        missed.count_miss += 1;
        assert_ne!(verification_hash(&missed, "Jeglerjeg"), original);

        let mut perfect = score();
        perfect.perfect = true;
        assert_ne!(verification_hash(&perfect, "Jeglerjeg"), original);
    }

    #[test]
    fn uleb128_boundaries() {
        let encode = |value| {
            let mut buffer = Vec::new();
            write_uleb128(&mut buffer, value).unwrap();
            buffer
        };

        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
    }

    #[test]
    fn strings_are_length_prefixed() {
        let mut empty = Vec::new();
        write_string(&mut empty, "").unwrap();
        assert_eq!(empty, vec![0x00]);

        let mut name = Vec::new();
        write_string(&mut name, "rina").unwrap();
        assert_eq!(name, b"\x0b\x04rina");
    }

    #[test]
    fn long_names_use_multi_byte_lengths() {
        let mut user = user();
        user.username = "a".repeat(200);
        let encoded = encode(&score(), &user, b"").unwrap();
        let mut cursor = Cursor::new(encoded.as_slice());

        cursor.set_position(5);
        read_string(&mut cursor);
        assert_eq!(read_string(&mut cursor), user.username);
    }
}
