pub(crate) mod aabb;
