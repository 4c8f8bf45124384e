pub mod map_view;
pub mod results_list;
pub mod search_form;
