//! Append-only body storage with one trail per body.

use crate::body::{Body, BodyId};
use crate::trail::{TrailBuffer, DEFAULT_TRAIL_CAPACITY};

/// Ordered collection of bodies, index-aligned with their trails.
///
/// `trails()[i]` always belongs to `bodies()[i]`. The only way to grow either
/// vector is [`BodyStore::insert`], which pushes to both.
#[derive(Debug, Clone)]
pub struct BodyStore {
    bodies: Vec<Body>,
    trails: Vec<TrailBuffer>,
    trail_capacity: usize,
}

impl BodyStore {
    /// Creates an empty store whose trails hold `trail_capacity` samples each
    pub fn new(trail_capacity: usize) -> Self {
        Self {
            bodies: Vec::new(),
            trails: Vec::new(),
            trail_capacity,
        }
    }

    /// Appends a body together with an empty trail and returns its id
    ///
    /// Returns [`BodyId::INVALID`] without storing anything once every
    /// representable id is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::Point2;
    /// use orrery::body::{Body, BodyId};
    /// use orrery::store::BodyStore;
    ///
    /// let mut store = BodyStore::new(16);
    /// let id = store.insert(Body::at_rest(Point2::origin(), 1.0e30));
    ///
    /// assert_eq!(id, BodyId(0));
    /// assert_eq!(store.len(), store.trails().len());
    /// ```
    pub fn insert(&mut self, body: Body) -> BodyId {
        let Some(id) = BodyId::from_index(self.bodies.len()) else {
            log::warn!("body store is full, {:?} not inserted", body.name());
            return BodyId::INVALID;
        };
        self.bodies.push(body);
        self.trails.push(TrailBuffer::new(self.trail_capacity));
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    pub fn trail(&self, id: BodyId) -> Option<&TrailBuffer> {
        self.trails.get(id.index())
    }

    /// First body carrying `name`, if any
    pub fn find_by_name(&self, name: &str) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.name() == Some(name))
            .map(|idx| BodyId(idx as u32))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn trails(&self) -> &[TrailBuffer] {
        &self.trails
    }

    /// Bodies paired with their trails, in insertion order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (BodyId, &Body, &TrailBuffer)> + '_ {
        self.bodies
            .iter()
            .zip(self.trails.iter())
            .enumerate()
            .map(|(idx, (body, trail))| (BodyId(idx as u32), body, trail))
    }

    /// Drops every body and trail. Only used when a simulation is reset.
    pub(crate) fn clear(&mut self) {
        self.bodies.clear();
        self.trails.clear();
    }

    /// Mutable views for the integrator. Lengths are fixed by the borrow.
    pub(crate) fn split_mut(&mut self) -> (&mut [Body], &mut [TrailBuffer]) {
        (&mut self.bodies, &mut self.trails)
    }
}

impl Default for BodyStore {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}
