//! Field labels as they appear in record files.
//!
//! Existing class directories written by the desktop roll-call tool use the
//! same labels, so they load without conversion.

/// Group record (`groups/<group>/<group>.txt`).
pub const GROUP_NAME: &str = "小组名称";
pub const GROUP_CREATED_AT: &str = "创建时间";
pub const GROUP_CLASS: &str = "所属班级";
pub const GROUP_SCORE: &str = "分数";

/// Student record (`students/<id>.txt`).
pub const STUDENT_ID: &str = "学号";
pub const STUDENT_NAME: &str = "姓名";
pub const STUDENT_GROUP: &str = "小组";
pub const STUDENT_JOINED_AT: &str = "加入时间";
pub const STUDENT_PHOTO: &str = "照片";

/// Status event (`status/<epoch-ms>.txt`).
pub const STATUS_SUBJECT: &str = "学生";
pub const STATUS_LABEL: &str = "状态";
pub const STATUS_TIME: &str = "时间";
