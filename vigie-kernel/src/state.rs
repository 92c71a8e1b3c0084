use parking_lot::Mutex;
use std::sync::Arc;

/// Emplacement partagé à remplacement complet.
/// Les lecteurs récupèrent un clone de l'Arc, l'écrivain remplace le pointeur :
/// aucune valeur n'est jamais visible à moitié écrite.
pub struct Slot<T> {
    inner: Mutex<Option<Arc<T>>>,
}

impl<T> Slot<T> {
    pub fn empty() -> Self {
        Self { inner: Mutex::new(None) }
    }

    pub fn load(&self) -> Option<Arc<T>> {
        self.inner.lock().clone()
    }

    pub fn store(&self, value: Arc<T>) {
        *self.inner.lock() = Some(value);
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::empty()
    }
}
