//! Per-thread scratch storage for residual evaluation.
use std::any::Any;
use std::cell::RefCell;
use std::thread::LocalKey;

/// Scratch buffers of arbitrary types, at most one per type.
///
/// An evaluation borrows its buffers from here and overwrites them before reading, so the
/// storage left by an earlier evaluation on the same thread is reused without reallocation.
#[derive(Debug, Default)]
pub struct Workspace {
    buffers: Vec<Box<dyn Any>>,
}

impl Workspace {
    /// The buffer of type `W`, created with `Default` on first use.
    pub fn get_or_default<W>(&mut self) -> &mut W
    where
        W: 'static + Default,
    {
        // Few distinct buffer types exist, so a linear scan is enough
        let index = match self.buffers.iter().position(|buffer| buffer.is::<W>()) {
            Some(index) => index,
            None => {
                self.buffers.push(Box::new(W::default()));
                self.buffers.len() - 1
            }
        };
        self.buffers[index]
            .downcast_mut()
            .expect("Buffer found by type must downcast to that type")
    }
}

/// Runs `f` with the scratch buffer of type `W` from the given thread-local workspace.
///
/// # Panics
///
/// Panics if called re-entrantly with the same workspace key.
pub(crate) fn with_thread_local_workspace<W, R>(
    workspace: &'static LocalKey<RefCell<Workspace>>,
    f: impl FnOnce(&mut W) -> R,
) -> R
where
    W: 'static + Default,
{
    workspace.with(|cell| {
        let mut buffers = cell.borrow_mut();
        f(buffers.get_or_default())
    })
}
