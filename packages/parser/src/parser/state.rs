use crate::lexer::TokenKind;
use crate::tree::NodeKind;

/// Which brace-delimited repetition a body state is parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Message,
    Enum,
    Service,
    Oneof,
    Extend,
    Rpc,
}

impl BodyKind {
    /// Tag for the closing brace; only scope-opening declarations get one.
    pub(crate) fn close_tag(self) -> Option<NodeKind> {
        match self {
            BodyKind::Message | BodyKind::Enum | BodyKind::Service | BodyKind::Oneof => {
                Some(NodeKind::ScopeClose)
            }
            BodyKind::Extend | BodyKind::Rpc => None,
        }
    }
}

/// Every grammar position the driver can resume from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    File,
    FragmentBody(BodyKind),
    Body(BodyKind),

    SyntaxDecl,
    Import,
    Package,
    PackageFinish,

    OptionStatement,
    OptionStatementAfterName,
    OptionStatementFinish,
    OptionName,
    OptionNamePart,
    OptionNameExtensionClose,
    OptionNameFinish,
    OptionList,
    /// Payload: whether an earlier item of the list already failed.
    OptionListItemFinish(bool),
    ListOption,
    ListOptionAfterName,
    ListOptionFinish,

    /// `message`, `enum`, `service` and `oneof`: keyword, name, body.
    Declaration(NodeKind),
    Extend,
    ExtendAfterName,
    DeclarationFinish(NodeKind),

    Field,
    FieldAfterType(NodeKind),
    FieldAfterMapValue,
    FieldFinish(NodeKind),
    EnumValue,
    Ranges(NodeKind),

    Rpc,
    RpcAfterInput,
    RpcAfterOutput,

    Value,
    TextMessage,
    TextMessageBody(TokenKind),
    TextField,
    TextFieldFinish,
    TextList,
    TextListItemFinish(bool),

    QualifiedIdent(Option<NodeKind>),
    QualifiedIdentRest,
    QualifiedIdentFinish(Option<NodeKind>),
}

/// Continuation record on the parser's explicit stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateStackEntry {
    pub state: State,
    /// Cursor position when the construct started; becomes the token of the
    /// node that eventually closes it.
    pub token: u32,
    /// Tree length when the construct started.
    pub subtree_start: u32,
    pub has_error: bool,
}
