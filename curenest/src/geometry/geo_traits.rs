/// Trait for types that can detect collisions between `Self` and `T`.
/// Boundaries are inclusive: touching counts as colliding.
pub trait CollidesWith<T> {
    fn collides_with(&self, other: &T) -> bool;
}

///  Trait for types that can detect 'almost-collisions' between `Self` and `T`.
///
/// Due to floating point arithmetic precision, two objects that are very close to each other may have unexpected behavior with
/// the [CollidesWith] trait. This trait errors on the side of false positives, so that if two objects are very close to each other,
/// they will be considered as colliding.
pub trait AlmostCollidesWith<T> {
    fn almost_collides_with(&self, other: &T) -> bool;
}

/// Trait for types that can detect whether `Self` and `T` share a region of strictly positive area.
/// Shapes that only touch along an edge or a corner do not overlap.
pub trait OverlapsWith<T> {
    fn overlaps_with(&self, other: &T) -> bool;
}
