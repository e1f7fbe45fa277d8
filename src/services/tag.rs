//! Tag processor: write, read, and delete operations against tags.
//!
//! Tags are global and carry no access rights; no requester is consulted.

use crate::domain::Tag;
use crate::ports::TrackerStore;
use crate::protocol::{Operation, ResponseBody, TagRequest};
use crate::services::{EngineError, EngineResult};

/// Routes a tag request to its operation handler.
///
/// # Errors
///
/// Returns [`EngineError::OperationNotSpecified`] when the request carries
/// no operation tag, otherwise whatever the operation produces.
pub fn process<S: TrackerStore + ?Sized>(
    store: &S,
    request: &TagRequest,
) -> EngineResult<ResponseBody> {
    match request.op.ok_or(EngineError::OperationNotSpecified)? {
        Operation::Write => write(store, request),
        Operation::Read => read(store, request),
        Operation::Delete => delete(store, request),
    }
}

/// Resolves the targeted tag: by id when given, else by name.
fn resolve<S: TrackerStore + ?Sized>(
    store: &S,
    request: &TagRequest,
) -> EngineResult<Option<Tag>> {
    if let Some(id) = request.id {
        return Ok(store.find_tag(id)?);
    }
    if let Some(name) = request.name.as_deref() {
        return Ok(store.find_tag_by_name(name)?);
    }
    Ok(None)
}

fn write<S: TrackerStore + ?Sized>(store: &S, request: &TagRequest) -> EngineResult<ResponseBody> {
    if let Some(mut tag) = resolve(store, request)? {
        if let Some(name) = request.name.clone() {
            tag.name = name;
        }
        if let Some(color) = request.color {
            tag.color = Some(color);
        }
        let updated = store.update_tag(&tag)?;
        return Ok(ResponseBody::Tags(vec![updated]));
    }

    let name = request
        .name
        .as_deref()
        .ok_or_else(|| EngineError::invalid("tag write requires a name to create"))?;
    let tag = store.insert_tag(name, request.color)?;
    Ok(ResponseBody::Tags(vec![tag]))
}

fn read<S: TrackerStore + ?Sized>(store: &S, request: &TagRequest) -> EngineResult<ResponseBody> {
    let tags: Vec<Tag> = if request.id.is_some() || request.name.is_some() {
        resolve(store, request)?.into_iter().collect()
    } else {
        store.all_tags()?
    };

    if tags.is_empty() {
        return Err(EngineError::TagNotFound);
    }
    Ok(ResponseBody::Tags(tags))
}

fn delete<S: TrackerStore + ?Sized>(store: &S, request: &TagRequest) -> EngineResult<ResponseBody> {
    let tag = resolve(store, request)?.ok_or(EngineError::TagNotFound)?;
    store.delete_tag(tag.id)?;
    Ok(ResponseBody::Ack)
}
