/// 规则模块
/// 
/// 包含规则配置、牌型结构判定、吃碰杠判定和计分

pub mod rules;
pub mod structure;
pub mod kong;
pub mod pong;
pub mod scoring;
