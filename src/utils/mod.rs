pub mod pacparse;
