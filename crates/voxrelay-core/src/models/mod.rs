//! VOXRELAY 도메인 모델.
//!
//! 브로커 입출력과 원격 제어 명령을 정의한다.
//! JSON 필드명은 브라우저 클라이언트와 맞추기 위해 camelCase를 사용한다.

pub mod command;
pub mod session;
