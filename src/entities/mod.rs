pub mod attachment;
pub mod checklist_template;
pub mod comment;
pub mod custom_location;
pub mod json_list;
pub mod location;
pub mod moving_part;
pub mod part;
pub mod part_movement;
pub mod passdown;
pub mod passdown_tech;
pub mod passdown_tool;
pub mod return_address;
pub mod rma;
pub mod rma_labor_entry;
pub mod rma_part;
pub mod rma_part_line_item;
pub mod tool;
pub mod tool_tag;
pub mod tool_technician;
pub mod track_trend;
pub mod track_trend_relation;
pub mod track_trend_tool;
pub mod user;
pub mod user_tool_assignment;
