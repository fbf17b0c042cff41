//! The diagram scene graph the import pass writes into.
//!
//! The importer talks to the scene through two traits: [`ElementRegistry`]
//! answers "has the element with this id been drawn yet", and [`SceneGraph`]
//! creates elements and inserts them into the containment tree. [`Canvas`] is
//! the in-memory implementation used by the library facade and the CLI.

mod canvas;
mod element;

pub use canvas::{Canvas, ElementSnapshot};
pub use element::{
    BandState, ConnectionState, DiagramElement, ElementRef, ElementType, ElementVariant,
    LabelState, ShapeState,
};

use chorus_core::identifier::Id;

/// Lookup of constructed elements by id.
pub trait ElementRegistry {
    fn get(&self, id: Id) -> Option<ElementRef>;
}

/// Creation and containment of diagram elements.
///
/// An `index` of `Some(0)` inserts at the front of the parent's children so the
/// element renders behind its siblings; `None` appends.
pub trait SceneGraph: ElementRegistry {
    /// Stores `element` and registers it under its id.
    fn create(&mut self, element: DiagramElement) -> ElementRef;

    fn add_shape(&mut self, element: ElementRef, parent: Option<ElementRef>, index: Option<usize>);

    fn add_connection(
        &mut self,
        element: ElementRef,
        parent: Option<ElementRef>,
        index: Option<usize>,
    );

    fn set_root_element(&mut self, element: ElementRef);

    fn root_element(&self) -> Option<ElementRef>;

    fn element(&self, element: ElementRef) -> &DiagramElement;

    fn element_mut(&mut self, element: ElementRef) -> &mut DiagramElement;

    /// Walks parent links up to the top-most ancestor of `element`.
    fn find_root(&self, element: ElementRef) -> ElementRef {
        let mut current = element;
        while let Some(parent) = self.element(current).parent() {
            current = parent;
        }
        current
    }
}
