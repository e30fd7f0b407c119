mod hit_grid;
mod layout_view;

#[doc(inline)]
pub use hit_grid::HitGrid;
#[doc(inline)]
pub use layout_view::LayoutView;
