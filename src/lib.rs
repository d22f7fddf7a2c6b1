//! # 图片导出工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 命令行 (main.rs, clap)                    │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ settings ─── ExportConfig JSON 读写                   │
//! │  │                                                       │
//! │  ├─ scene ────── 内置矢量场景（SceneRenderer 实现）       │
//! │  │                                                       │
//! │  └─ exporter ─── 宽高联动 · 背景 · 缩放 · 渲染 · 反转 · 投递 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 应用级错误类型 `AppError` |
//! | [`exporter`] | 导出会话与各阶段实现 |
//! | [`scene`] | JSON 描述的矩形/线段/位图场景 |
//! | [`settings`] | 导出配置文件的加载与保存 |

pub mod error;
pub mod exporter;
pub mod scene;
pub mod settings;
