//! Expected sets reported in diagnostics.

use crate::error::Expectation as E;
use crate::lexer::TokenKind as T;

pub(super) const SEMICOLON: &[E] = &[E::Token(T::Semicolon)];
pub(super) const EQUALS: &[E] = &[E::Token(T::Equals)];
pub(super) const COMMA: &[E] = &[E::Token(T::Comma)];
pub(super) const COLON: &[E] = &[E::Token(T::Colon)];
pub(super) const LBRACE: &[E] = &[E::Token(T::LBrace)];
pub(super) const LPAREN: &[E] = &[E::Token(T::LParen)];
pub(super) const RBRACE: &[E] = &[E::Token(T::RBrace)];
pub(super) const RPAREN: &[E] = &[E::Token(T::RParen)];
pub(super) const RBRACKET: &[E] = &[E::Token(T::RBracket)];
pub(super) const RANGLE: &[E] = &[E::Token(T::RAngle)];
pub(super) const STRING: &[E] = &[E::Token(T::StringLiteral)];
pub(super) const INTEGER: &[E] = &[E::Token(T::IntLiteral)];

pub(super) const IDENTIFIER: &[E] = &[E::Identifier];
pub(super) const TYPE: &[E] = &[E::Type];
pub(super) const MAP_KEY: &[E] = &[E::MapKeyType];
pub(super) const VALUE: &[E] = &[E::Value];
pub(super) const RETURNS: &[E] = &[E::Contextual("returns")];
pub(super) const TOP_LEVEL: &[E] = &[E::TopLevelStatement];
pub(super) const TEXT_FIELD_NAME: &[E] = &[E::TextFieldName];
pub(super) const OPTION_NAME: &[E] = &[E::Identifier, E::Token(T::LParen)];

pub(super) const FIELD_END: &[E] = &[E::Token(T::Semicolon), E::Token(T::LBracket)];
pub(super) const RPC_END: &[E] = &[E::Token(T::Semicolon), E::Token(T::LBrace)];
pub(super) const LIST_SEPARATOR: &[E] = &[E::Token(T::Comma), E::Token(T::RBracket)];

pub(super) const RESERVED_RANGE: &[E] = &[
    E::Token(T::IntLiteral),
    E::Token(T::StringLiteral),
    E::Identifier,
];
pub(super) const RANGE_END: &[E] = &[E::Token(T::IntLiteral), E::Contextual("max")];

pub(super) const MESSAGE_BODY: &[E] = &[
    E::Token(T::Option),
    E::Token(T::Reserved),
    E::FieldStart,
];
pub(super) const ONEOF_BODY: &[E] = &[E::Token(T::Option), E::FieldStart];
pub(super) const EXTEND_BODY: &[E] = &[E::FieldStart];
pub(super) const ENUM_BODY: &[E] = &[
    E::Token(T::Option),
    E::Token(T::Reserved),
    E::EnumValue,
];
pub(super) const SERVICE_BODY: &[E] = &[E::Token(T::Option), E::Token(T::Rpc)];
pub(super) const RPC_BODY: &[E] = &[E::Token(T::Option)];
