//! ID3v2.3 tag writer: validates frames, encodes them and prepends the
//! finished tag to a raw audio buffer.

pub mod common;
pub mod id3;

pub use common::error::{Id3WriterError, Result};
pub use id3::frames::{FrameValue, Lyrics, Private, UserText};
pub use id3::mime::MimeType;
pub use id3::writer::TagWriter;

#[cfg(feature = "python")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;


#[cfg(feature = "python")]
mod python_bindings {
use super::*;
use pyo3::prelude::*;
use pyo3::types::{PyByteArray, PyBytes, PyDict, PyList, PyString};

/// ID3v2.3 tag builder wrapping an audio buffer.
#[pyclass(name = "ID3Writer")]
#[derive(Debug)]
struct PyID3Writer {
    writer: TagWriter<'static>,
}

#[pymethods]
impl PyID3Writer {
    #[new]
    #[pyo3(signature = (buffer=None))]
    fn new(buffer: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let audio = buffer
            .and_then(py_to_bytes)
            .ok_or(Id3WriterError::InvalidConstructionArgument)?;
        Ok(PyID3Writer {
            writer: TagWriter::new(audio),
        })
    }

    fn set_frame<'py>(
        mut slf: PyRefMut<'py, Self>,
        name: &str,
        value: &Bound<'py, PyAny>,
    ) -> PyResult<PyRefMut<'py, Self>> {
        let value = py_to_frame_value(name, value)?;
        slf.writer.set_frame(name, value)?;
        Ok(slf)
    }

    /// Build the tagged buffer.
    fn add_tag<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new(py, &self.writer.finalize())
    }

    #[getter]
    fn padding(&self) -> u32 {
        self.writer.padding()
    }

    #[setter]
    fn set_padding(&mut self, padding: u32) -> PyResult<()> {
        self.writer.with_padding(padding)?;
        Ok(())
    }

    fn frames(&self) -> Vec<String> {
        self.writer.frames().ids()
    }

    fn __repr__(&self) -> String {
        format!(
            "ID3Writer(frames=[{}], audio={} bytes)",
            self.writer.frames().ids().join(", "),
            self.writer.audio().len()
        )
    }
}

fn py_to_bytes(obj: &Bound<'_, PyAny>) -> Option<Vec<u8>> {
    if let Ok(bytes) = obj.downcast::<PyBytes>() {
        Some(bytes.as_bytes().to_vec())
    } else if let Ok(array) = obj.downcast::<PyByteArray>() {
        Some(array.to_vec())
    } else {
        None
    }
}

fn dict_str(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<String>> {
    match dict.get_item(key)? {
        Some(v) if !v.is_none() => Ok(Some(v.extract::<String>()?)),
        _ => Ok(None),
    }
}

/// Map a Python value onto the closest `FrameValue` shape; the registry
/// decides later whether the shape suits the frame.
fn py_to_frame_value(name: &str, value: &Bound<'_, PyAny>) -> PyResult<FrameValue> {
    let invalid = |reason: &str| Id3WriterError::InvalidFrameValue {
        id: name.to_string(),
        reason: reason.to_string(),
    };

    if let Some(bytes) = py_to_bytes(value) {
        return Ok(FrameValue::Bytes(bytes));
    }
    if let Ok(s) = value.downcast::<PyString>() {
        return Ok(FrameValue::Text(s.to_str()?.to_string()));
    }
    if let Ok(list) = value.downcast::<PyList>() {
        let strings = list
            .extract::<Vec<String>>()
            .map_err(|_| invalid("an array of strings"))?;
        return Ok(FrameValue::List(strings));
    }
    if let Ok(dict) = value.downcast::<PyDict>() {
        if let Some(data) = dict.get_item("data")? {
            let data = py_to_bytes(&data).ok_or_else(|| invalid("a byte buffer"))?;
            let owner = dict_str(dict, "id")?.unwrap_or_default();
            return Ok(FrameValue::Private(Private { owner, data }));
        }
        if let Some(v) = dict_str(dict, "value")? {
            return Ok(FrameValue::UserText(UserText {
                description: dict_str(dict, "description")?.unwrap_or_default(),
                value: v,
            }));
        }
        let text = match dict_str(dict, "lyrics")? {
            Some(t) => t,
            None => dict_str(dict, "text")?.unwrap_or_default(),
        };
        return Ok(FrameValue::Lyrics(Lyrics {
            language: dict_str(dict, "language")?,
            description: dict_str(dict, "description")?,
            text,
        }));
    }
    if let Ok(n) = value.extract::<u64>() {
        return Ok(FrameValue::Number(n));
    }
    Err(invalid("a supported value type").into())
}

#[pymodule]
fn id3_writer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyID3Writer>()?;

    m.add("ID3WriterError", m.py().get_type::<common::error::ID3WriterPyError>())?;
    m.add(
        "InvalidConstructionArgumentError",
        m.py().get_type::<common::error::InvalidConstructionArgumentError>(),
    )?;
    m.add("UnsupportedFrameError", m.py().get_type::<common::error::UnsupportedFrameError>())?;
    m.add("InvalidFrameValueError", m.py().get_type::<common::error::InvalidFrameValueError>())?;
    m.add(
        "UnknownPictureMimeTypeError",
        m.py().get_type::<common::error::UnknownPictureMimeTypeError>(),
    )?;
    m.add("TagTooLargeError", m.py().get_type::<common::error::TagTooLargeError>())?;

    Ok(())
}
} // mod python_bindings
