pub mod a001_community_post;
pub mod a002_crop_field;
pub mod a003_field;
pub mod a004_task;
