use crate::shape::Shape;

/// Committed shapes in insertion order. The order is both z-order and undo order, so the store
/// doubles as the undo stack: undo pops the tail and the popped shape is gone for good.
#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    shapes: Vec<Shape>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, shape: Shape) {
        tracing::info!(tool = ?shape.tool(), count = self.shapes.len() + 1, "committed shape");
        self.shapes.push(shape);
    }

    /// Removes and returns the most recent shape. Empty store is a no-op.
    pub fn undo_last(&mut self) -> Option<Shape> {
        let popped = self.shapes.pop();
        match &popped {
            Some(shape) => {
                tracing::info!(tool = ?shape.tool(), remaining = self.shapes.len(), "undo")
            }
            None => tracing::debug!("undo on empty store ignored"),
        }
        popped
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn last(&self) -> Option<&Shape> {
        self.shapes.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;
    use crate::shape::Color4;

    fn text(s: &str) -> Shape {
        Shape::text(point(0.0, 0.0), s, Color4::RED)
    }

    #[test]
    fn undo_pops_in_lifo_order() {
        let mut store = AnnotationStore::new();
        store.commit(text("s1"));
        store.commit(text("s2"));
        store.commit(text("s3"));

        assert_eq!(store.undo_last(), Some(text("s3")));
        assert_eq!(store.shapes(), &[text("s1"), text("s2")]);

        store.undo_last();
        assert_eq!(store.shapes(), &[text("s1")]);
    }

    #[test]
    fn undo_on_empty_store_is_noop() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.undo_last(), None);
        assert!(store.is_empty());

        store.commit(text("a"));
        store.undo_last();
        assert_eq!(store.undo_last(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn commit_appends_to_tail() {
        let mut store = AnnotationStore::new();
        for i in 0..100 {
            store.commit(text(&i.to_string()));
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.last(), Some(&text("99")));
    }
}
