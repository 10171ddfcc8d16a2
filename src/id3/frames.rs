use crate::common::error::{Id3WriterError, Result};
use crate::id3::mime::{self, MimeType};
use crate::id3::specs::{self, Encoding, PictureType, DEFAULT_LANGUAGE};

/// A 4-character frame identifier from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId([u8; 4]);

impl FrameId {
    /// Parse and look up an identifier, returning it with its category.
    pub fn lookup(id: &str) -> Result<(FrameId, FrameKind)> {
        let bytes = id.as_bytes();
        let unsupported = || Id3WriterError::UnsupportedFrame(id.to_string());
        if bytes.len() != 4
            || !bytes.iter().all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(unsupported());
        }
        REGISTRY
            .iter()
            .find(|(known, _)| known.as_bytes() == bytes)
            .map(|&(_, kind)| (FrameId([bytes[0], bytes[1], bytes[2], bytes[3]]), kind))
            .ok_or_else(unsupported)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII identifiers from the registry are ever constructed
        std::str::from_utf8(&self.0).unwrap_or("XXXX")
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame category; decides which value shape is accepted and how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Several strings, e.g. artists or genres.
    MultiText,
    /// A single string.
    Text,
    /// A non-negative integer written as decimal text.
    Numeric,
    /// Language, description and long text (USLT, COMM).
    Lyrics,
    /// User-defined text with a description (TXXX).
    UserText,
    /// ASCII URL without an encoding byte.
    Url,
    /// Owner identifier plus opaque bytes (PRIV).
    Private,
    /// Embedded image (APIC).
    Picture,
}

const REGISTRY: &[(&str, FrameKind)] = &[
    ("TPE1", FrameKind::MultiText), // artists
    ("TCOM", FrameKind::MultiText), // composers
    ("TCON", FrameKind::MultiText), // genres
    ("TIT1", FrameKind::Text),
    ("TIT2", FrameKind::Text), // title
    ("TIT3", FrameKind::Text),
    ("TALB", FrameKind::Text), // album
    ("TPE2", FrameKind::Text), // album artist
    ("TPE3", FrameKind::Text),
    ("TPE4", FrameKind::Text),
    ("TRCK", FrameKind::Text), // "n" or "n/total"
    ("TPOS", FrameKind::Text),
    ("TMED", FrameKind::Text),
    ("TPUB", FrameKind::Text),
    ("TCOP", FrameKind::Text),
    ("TKEY", FrameKind::Text),
    ("TEXT", FrameKind::Text),
    ("TSRC", FrameKind::Text),
    ("TLAN", FrameKind::Text),
    ("TDAT", FrameKind::Text),
    ("TBPM", FrameKind::Numeric),
    ("TLEN", FrameKind::Numeric),
    ("TYER", FrameKind::Numeric),
    ("USLT", FrameKind::Lyrics),
    ("COMM", FrameKind::Lyrics),
    ("TXXX", FrameKind::UserText),
    ("WCOM", FrameKind::Url),
    ("WCOP", FrameKind::Url),
    ("WOAF", FrameKind::Url),
    ("WOAR", FrameKind::Url),
    ("WOAS", FrameKind::Url),
    ("WORS", FrameKind::Url),
    ("WPAY", FrameKind::Url),
    ("WPUB", FrameKind::Url),
    ("PRIV", FrameKind::Private),
    ("APIC", FrameKind::Picture),
];

/// All identifiers accepted by [`FrameId::lookup`].
pub fn supported_frames() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(id, _)| *id)
}

/// Value handed to `set_frame`. Which variant is accepted depends on the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameValue {
    Text(String),
    List(Vec<String>),
    Number(u64),
    Bytes(Vec<u8>),
    Lyrics(Lyrics),
    UserText(UserText),
    Private(Private),
}

/// USLT/COMM content. Language defaults to `eng`, description to empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lyrics {
    pub language: Option<String>,
    pub description: Option<String>,
    pub text: String,
}

/// TXXX content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserText {
    pub description: String,
    pub value: String,
}

/// PRIV content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Private {
    pub owner: String,
    pub data: Vec<u8>,
}

impl From<&str> for FrameValue {
    fn from(s: &str) -> Self {
        FrameValue::Text(s.to_string())
    }
}

impl From<String> for FrameValue {
    fn from(s: String) -> Self {
        FrameValue::Text(s)
    }
}

impl From<Vec<String>> for FrameValue {
    fn from(list: Vec<String>) -> Self {
        FrameValue::List(list)
    }
}

impl From<Vec<&str>> for FrameValue {
    fn from(list: Vec<&str>) -> Self {
        FrameValue::List(list.into_iter().map(str::to_string).collect())
    }
}

impl From<u64> for FrameValue {
    fn from(n: u64) -> Self {
        FrameValue::Number(n)
    }
}

impl From<u32> for FrameValue {
    fn from(n: u32) -> Self {
        FrameValue::Number(n as u64)
    }
}

impl From<Vec<u8>> for FrameValue {
    fn from(data: Vec<u8>) -> Self {
        FrameValue::Bytes(data)
    }
}

impl From<&[u8]> for FrameValue {
    fn from(data: &[u8]) -> Self {
        FrameValue::Bytes(data.to_vec())
    }
}

impl From<Lyrics> for FrameValue {
    fn from(lyrics: Lyrics) -> Self {
        FrameValue::Lyrics(lyrics)
    }
}

impl From<UserText> for FrameValue {
    fn from(text: UserText) -> Self {
        FrameValue::UserText(text)
    }
}

impl From<Private> for FrameValue {
    fn from(private: Private) -> Self {
        FrameValue::Private(private)
    }
}

/// A frame value that passed validation and can be encoded without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedValue {
    Strings(Vec<String>),
    Lyrics {
        language: [u8; 3],
        description: String,
        text: String,
    },
    UserText {
        description: String,
        value: String,
    },
    Url(String),
    Private {
        owner: String,
        data: Vec<u8>,
    },
    Picture {
        mime: MimeType,
        data: Vec<u8>,
    },
}

// ---- Validation ----

/// Check `value` against the category of `id`.
pub fn validate(id: &str, value: FrameValue) -> Result<(FrameId, ValidatedValue)> {
    let (frame_id, kind) = FrameId::lookup(id)?;
    let id = frame_id.as_str();

    let validated = match (kind, value) {
        (FrameKind::MultiText, FrameValue::List(list)) => {
            if list.is_empty() {
                return Err(Id3WriterError::invalid_value(id, "a non-empty array of strings"));
            }
            if list.iter().any(String::is_empty) {
                return Err(Id3WriterError::invalid_value(id, "an array of non-empty strings"));
            }
            ValidatedValue::Strings(list)
        }
        (FrameKind::MultiText, _) => {
            return Err(Id3WriterError::invalid_value(id, "an array of strings"));
        }

        (FrameKind::Text, FrameValue::Text(text)) => ValidatedValue::Strings(vec![text]),
        (FrameKind::Text, _) => return Err(Id3WriterError::invalid_value(id, "a string")),

        (FrameKind::Numeric, FrameValue::Number(n)) => {
            ValidatedValue::Strings(vec![itoa::Buffer::new().format(n).to_string()])
        }
        (FrameKind::Numeric, FrameValue::Text(text))
            if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) =>
        {
            ValidatedValue::Strings(vec![text])
        }
        (FrameKind::Numeric, _) => return Err(Id3WriterError::invalid_value(id, "an integer")),

        (FrameKind::Lyrics, FrameValue::Text(text)) => ValidatedValue::Lyrics {
            language: DEFAULT_LANGUAGE,
            description: String::new(),
            text,
        },
        (FrameKind::Lyrics, FrameValue::Lyrics(lyrics)) => {
            let language = match lyrics.language.as_deref() {
                None => DEFAULT_LANGUAGE,
                Some(code) => specs::parse_language(code).ok_or_else(|| {
                    Id3WriterError::invalid_value(id, "lyrics with a 3-letter language code")
                })?,
            };
            ValidatedValue::Lyrics {
                language,
                description: lyrics.description.unwrap_or_default(),
                text: lyrics.text,
            }
        }
        (FrameKind::Lyrics, _) => {
            return Err(Id3WriterError::invalid_value(id, "a string or lyrics"));
        }

        (FrameKind::UserText, FrameValue::UserText(user)) => ValidatedValue::UserText {
            description: user.description,
            value: user.value,
        },
        (FrameKind::UserText, _) => {
            return Err(Id3WriterError::invalid_value(id, "a description/value pair"));
        }

        (FrameKind::Url, FrameValue::Text(url)) if url.is_ascii() => ValidatedValue::Url(url),
        (FrameKind::Url, _) => return Err(Id3WriterError::invalid_value(id, "an ASCII URL string")),

        (FrameKind::Private, FrameValue::Private(private)) if private.owner.is_ascii() => {
            ValidatedValue::Private {
                owner: private.owner,
                data: private.data,
            }
        }
        (FrameKind::Private, _) => {
            return Err(Id3WriterError::invalid_value(
                id,
                "an ASCII owner identifier with binary data",
            ));
        }

        (FrameKind::Picture, FrameValue::Bytes(data)) => {
            let mime = mime::sniff(&data)?;
            log::debug!("{}: detected {} ({} bytes)", id, mime, data.len());
            ValidatedValue::Picture { mime, data }
        }
        (FrameKind::Picture, _) => return Err(Id3WriterError::invalid_value(id, "a byte buffer")),
    };

    Ok((frame_id, validated))
}

// ---- Encoders ----

impl ValidatedValue {
    /// Encode the frame body (everything after the 10-byte frame header).
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.body_len());
        match self {
            ValidatedValue::Strings(list) => write_text_list(&mut data, list),
            ValidatedValue::Lyrics {
                language,
                description,
                text,
            } => write_lyrics(&mut data, language, description, text),
            ValidatedValue::UserText { description, value } => {
                write_user_text(&mut data, description, value)
            }
            ValidatedValue::Url(url) => data.extend_from_slice(url.as_bytes()),
            ValidatedValue::Private { owner, data: payload } => {
                data.extend_from_slice(owner.as_bytes());
                data.extend_from_slice(Encoding::Latin1.null_terminator());
                data.extend_from_slice(payload);
            }
            ValidatedValue::Picture { mime, data: image } => write_picture(&mut data, *mime, image),
        }
        data
    }

    /// Length of [`encode`](Self::encode)'s output, computed without encoding.
    pub fn body_len(&self) -> usize {
        let term = Encoding::Utf16.null_terminator().len();
        match self {
            ValidatedValue::Strings(list) => {
                let units: usize = list.iter().map(|s| s.encode_utf16().count() * 2).sum();
                1 + specs::UTF16_LE_BOM.len() + units + term * (list.len().saturating_sub(1))
            }
            ValidatedValue::Lyrics {
                description, text, ..
            } => 1 + 3 + specs::utf16_len(description) + term + specs::utf16_len(text),
            ValidatedValue::UserText { description, value } => {
                1 + specs::utf16_len(description) + term + specs::utf16_len(value)
            }
            ValidatedValue::Url(url) => url.len(),
            ValidatedValue::Private { owner, data } => owner.len() + 1 + data.len(),
            ValidatedValue::Picture { mime, data } => 1 + mime.as_str().len() + 1 + 1 + 1 + data.len(),
        }
    }
}

fn write_text_list(data: &mut Vec<u8>, list: &[String]) {
    data.push(Encoding::Utf16 as u8);
    data.extend_from_slice(&specs::UTF16_LE_BOM);
    for (i, text) in list.iter().enumerate() {
        if i > 0 {
            data.extend_from_slice(Encoding::Utf16.null_terminator());
        }
        specs::write_utf16_units(data, text);
    }
}

fn write_lyrics(data: &mut Vec<u8>, language: &[u8; 3], description: &str, text: &str) {
    data.push(Encoding::Utf16 as u8);
    data.extend_from_slice(language);
    specs::write_utf16(data, description);
    data.extend_from_slice(Encoding::Utf16.null_terminator());
    specs::write_utf16(data, text);
}

fn write_user_text(data: &mut Vec<u8>, description: &str, value: &str) {
    data.push(Encoding::Utf16 as u8);
    specs::write_utf16(data, description);
    data.extend_from_slice(Encoding::Utf16.null_terminator());
    specs::write_utf16(data, value);
}

fn write_picture(data: &mut Vec<u8>, mime: MimeType, image: &[u8]) {
    data.push(Encoding::Latin1 as u8);
    data.extend_from_slice(mime.as_str().as_bytes());
    data.push(0); // null-terminate MIME
    data.push(PictureType::CoverFront as u8);
    data.extend_from_slice(Encoding::Latin1.null_terminator()); // empty description
    data.extend_from_slice(image);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn lookup_rejects_unknown_and_malformed_ids() {
        for id in ["XYZQ", "wrongFrameName", "tit2", "TIT", "", "TIT2 ", "ÄBCD"] {
            assert_eq!(
                FrameId::lookup(id),
                Err(Id3WriterError::UnsupportedFrame(id.to_string())),
                "{id}"
            );
        }
        let (id, kind) = FrameId::lookup("APIC").unwrap();
        assert_eq!(id.as_str(), "APIC");
        assert_eq!(kind, FrameKind::Picture);
    }

    #[test]
    fn every_registered_id_is_well_formed() {
        for id in supported_frames() {
            assert!(FrameId::lookup(id).is_ok(), "{id}");
        }
        assert_eq!(supported_frames().count(), REGISTRY.len());
    }

    #[test]
    fn unsupported_wins_over_bad_value() {
        assert!(matches!(
            validate("XYZQ", FrameValue::List(vec![])),
            Err(Id3WriterError::UnsupportedFrame(_))
        ));
    }

    #[test]
    fn multi_text_shape_checks() {
        for id in ["TPE1", "TCOM", "TCON"] {
            let err = validate(id, "".into()).unwrap_err();
            assert!(err.to_string().ends_with("frame value should be an array of strings"));
            assert!(matches!(
                validate(id, FrameValue::List(vec![])),
                Err(Id3WriterError::InvalidFrameValue { .. })
            ));
            assert!(validate(id, vec!["Rock", ""].into()).is_err());
        }
    }

    #[test]
    fn multi_text_body() {
        let (_, value) = validate("TPE1", vec!["A", "B"].into()).unwrap();
        let mut expected = vec![1, 0xFF, 0xFE];
        expected.extend(utf16("A"));
        expected.extend([0, 0]);
        expected.extend(utf16("B"));
        assert_eq!(value.encode(), expected);
    }

    #[test]
    fn genre_decodes_back() {
        let (_, value) = validate("TCON", vec!["Rock"].into()).unwrap();
        let body = value.encode();
        assert_eq!(body[0], 1);
        let (text, _, had_errors) = encoding_rs::UTF_16LE.decode(&body[1..]);
        assert!(!had_errors);
        assert_eq!(text, "Rock");
    }

    #[test]
    fn single_text_and_numbers() {
        assert!(validate("TIT2", vec!["x"].into()).is_err());
        let (_, value) = validate("TYER", 2024u32.into()).unwrap();
        assert_eq!(value, ValidatedValue::Strings(vec!["2024".into()]));
        let (_, value) = validate("TBPM", "120".into()).unwrap();
        assert_eq!(value, ValidatedValue::Strings(vec!["120".into()]));
        assert!(validate("TLEN", "12a".into()).is_err());
        assert!(validate("TLEN", "".into()).is_err());
    }

    #[test]
    fn lyrics_from_plain_text() {
        let (_, value) = validate("USLT", "Hi".into()).unwrap();
        let mut expected = vec![1, b'e', b'n', b'g', 0xFF, 0xFE, 0, 0, 0xFF, 0xFE];
        expected.extend(utf16("Hi"));
        assert_eq!(value.encode(), expected);
    }

    #[test]
    fn lyrics_language_and_description() {
        let lyrics = Lyrics {
            language: Some("DEU".into()),
            description: Some("d".into()),
            text: "t".into(),
        };
        let (_, value) = validate("COMM", lyrics.into()).unwrap();
        assert_eq!(
            value.encode(),
            vec![1, b'd', b'e', b'u', 0xFF, 0xFE, b'd', 0, 0, 0, 0xFF, 0xFE, b't', 0]
        );

        let bad = Lyrics {
            language: Some("english".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate("USLT", bad.into()),
            Err(Id3WriterError::InvalidFrameValue { .. })
        ));
        assert!(validate("USLT", 5u32.into()).is_err());
    }

    #[test]
    fn user_text_body() {
        let value = UserText {
            description: "k".into(),
            value: "v".into(),
        };
        let (_, value) = validate("TXXX", value.into()).unwrap();
        assert_eq!(value.encode(), vec![1, 0xFF, 0xFE, b'k', 0, 0, 0, 0xFF, 0xFE, b'v', 0]);
        assert!(validate("TXXX", "k=v".into()).is_err());
    }

    #[test]
    fn url_and_private_bodies() {
        let (_, value) = validate("WOAR", "https://example.com".into()).unwrap();
        assert_eq!(value.encode(), b"https://example.com".to_vec());
        assert!(validate("WOAR", "https://exämple.com".into()).is_err());

        let private = Private {
            owner: "org.example".into(),
            data: vec![1, 2],
        };
        let (_, value) = validate("PRIV", private.into()).unwrap();
        assert_eq!(value.encode(), b"org.example\x00\x01\x02".to_vec());
    }

    #[test]
    fn picture_body() {
        let image = vec![0xFF, 0xD8, 0xFF, 1, 2, 3];
        let (_, value) = validate("APIC", image.clone().into()).unwrap();
        let mut expected = vec![0];
        expected.extend_from_slice(b"image/jpeg");
        expected.extend([0, 3, 0]);
        expected.extend(image);
        assert_eq!(value.encode(), expected);
    }

    #[test]
    fn picture_errors_come_from_sniffer() {
        assert_eq!(
            validate("APIC", FrameValue::Bytes(vec![])),
            Err(Id3WriterError::UnknownPictureMimeType)
        );
        assert_eq!(
            validate("APIC", FrameValue::Bytes(vec![0; 20])),
            Err(Id3WriterError::UnknownPictureMimeType)
        );
        assert!(matches!(
            validate("APIC", "cover.jpg".into()),
            Err(Id3WriterError::InvalidFrameValue { .. })
        ));
    }

    #[test]
    fn body_len_matches_encoding() {
        let values: Vec<(&str, FrameValue)> = vec![
            ("TPE1", vec!["Артист", "B", "\u{1F3B5}"].into()),
            ("TIT2", "".into()),
            ("TLEN", 180000u64.into()),
            ("USLT", "Вышел заяц".into()),
            ("TXXX", UserText::default().into()),
            ("WPUB", "http://x".into()),
            ("PRIV", Private::default().into()),
            ("APIC", vec![0x42, 0x4D].into()),
        ];
        for (id, value) in values {
            let (_, validated) = validate(id, value).unwrap();
            assert_eq!(validated.body_len(), validated.encode().len(), "{id}");
        }
    }
}
