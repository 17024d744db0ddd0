use crate::PathDescription;

/// Receiver for the wave path, once per frame and once at rest.
pub trait PathSink {
    fn emit(&mut self, path: &PathDescription);
}

impl<F> PathSink for F
where
    F: FnMut(&PathDescription),
{
    fn emit(&mut self, path: &PathDescription) {
        self(path)
    }
}

/// Sink that keeps every emitted path, newest last.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    paths: Vec<PathDescription>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[PathDescription] {
        &self.paths
    }

    pub fn last(&self) -> Option<&PathDescription> {
        self.paths.last()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

impl PathSink for RecordingSink {
    fn emit(&mut self, path: &PathDescription) {
        self.paths.push(path.clone());
    }
}

/// Wraps path data in a standalone SVG document using the underline's
/// normalised `0 0 1 1` view box, stretched to whatever box it is placed in.
pub fn svg_document(path: &PathDescription) -> String {
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1" preserveAspectRatio="none" overflow="visible">"#,
            r#"<path d="{}" fill="none" stroke="currentColor" vector-effect="non-scaling-stroke"/>"#,
            "</svg>"
        ),
        path
    )
}
