// Python bindings (feature "python")

use std::collections::{BTreeMap, HashMap};

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;

use crate::error::GenerateError;
use crate::{GenerateOptions, Pattern, Remap, TagMap};

/// Compiled substitution pattern
#[pyclass(name = "Pattern", frozen)]
pub struct PyPattern {
    inner: Pattern,
}

#[pymethods]
impl PyPattern {
    #[new]
    fn new(pattern: &str) -> Self {
        PyPattern {
            inner: Pattern::compile(pattern),
        }
    }

    /// Warnings for `%` sequences kept as literal text
    #[getter]
    fn warnings(&self) -> Vec<String> {
        self.inner.warnings().iter().map(ToString::to_string).collect()
    }

    /// Extract tags from a path; None when the path does not match
    fn fn2tag(&self, path: &str) -> Option<BTreeMap<String, String>> {
        self.inner.match_path(path).ok().map(|values| {
            values
                .into_iter()
                .map(|(kind, value)| (kind.name().to_string(), value))
                .collect()
        })
    }

    /// Build a filename from a dict of tag name -> list of values
    #[pyo3(signature = (tags, total=None, strip=None, remap=None))]
    fn tag2fn(
        &self,
        tags: HashMap<String, Vec<String>>,
        total: Option<usize>,
        strip: Option<&str>,
        remap: Option<&str>,
    ) -> PyResult<String> {
        let mut map = TagMap::new();
        for (key, values) in tags {
            map.set(&key, values);
        }

        let mut options = GenerateOptions::new();
        if let Some(total) = total {
            options = options.with_justify(total);
        }
        if let Some(strip) = strip {
            options = options.with_strip(strip);
        }
        if let Some(remap) = remap {
            let remap: Remap = remap
                .parse()
                .map_err(|e: crate::RemapError| PyValueError::new_err(e.to_string()))?;
            options = options.with_remap(remap);
        }

        self.inner.generate(&map, &options).map_err(|e| match e {
            GenerateError::MissingField(_) => PyKeyError::new_err(e.to_string()),
        })
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Pattern({:?})", self.inner.as_str())
    }
}

/// pathtag - convert between audio file paths and tags
#[pymodule]
fn pathtag(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPattern>()?;
    Ok(())
}
