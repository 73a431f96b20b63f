use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::id::EntityId;
use crate::models::{Position, Size};

/// Contract every storable record satisfies.
///
/// `KIND` partitions the backend into independent collections; the id
/// accessors tie a record to its stored document; `name` drives
/// `find_by_name` lookups. Store operations are generic over an `Entity`
/// type — the type parameter identifies the collection the way a witness
/// value did in older designs, and serde decodes query results without any
/// reflective construction. `Default` is the zero value of the concrete
/// type.
pub trait Entity: Serialize + DeserializeOwned + Default + Send + 'static {
    const KIND: &'static str;

    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

/// Dashboard tiles (graphs, embedded webpages) carry a position and size on
/// top of the base contract.
pub trait Widget: Entity {
    fn set_size(&mut self, size: Option<Size>);
    fn set_position(&mut self, position: Option<Position>);
}
