mod gateway_signature;

pub use gateway_signature::{
    check_signature,
    GatewaySignature,
    GatewaySignatureService,
    SignatureError,
    SIGNATURE_HEADER,
};
