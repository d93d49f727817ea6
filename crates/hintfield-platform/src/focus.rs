use hintfield_core::ViewId;

/// Next entry in the focus chain after `current`, wrapping. An unknown or
/// missing `current` starts from the front.
pub(crate) fn next_in_chain(chain: &[ViewId], current: Option<ViewId>) -> Option<ViewId> {
    if chain.is_empty() {
        return None;
    }
    let next = match current.and_then(|cur| chain.iter().position(|&id| id == cur)) {
        Some(idx) => chain[(idx + 1) % chain.len()],
        None => chain[0],
    };
    Some(next)
}
