// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    address::Address,
    amount::Lovelace,
    common::{TxHash, Utxo},
    error::{Error, Result},
    parameters::ProtocolParameters,
    Network,
};
use minicbor::{data::Type, Decoder, Encoder};
use std::{collections::BTreeSet, convert::Infallible};

/// Upper bound on fee recalculations before giving up.
const MAX_FEE_ITERATIONS: usize = 8;
/// `[vkey, signature]` pair: array header, two byte string headers, 32 + 64 bytes.
const VKEY_WITNESS_SIZE: usize = 1 + 2 + 32 + 2 + 64;
/// Witness set map header, key and array header.
const WITNESS_SET_OVERHEAD: usize = 3;
/// Outer array header plus the validity flag and empty auxiliary data.
const ENVELOPE_OVERHEAD: usize = 3;
/// Constant added to the serialized output size in the min-utxo rule.
const UTXO_ENTRY_OVERHEAD: u64 = 160;

type EncodeResult = std::result::Result<(), minicbor::encode::Error<Infallible>>;

/// A single payment to a fixed recipient on a known network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    recipient: Address,
    amount: Lovelace,
    network: Network,
}

impl PaymentRequest {
    /// Fails if the recipient lives on another network, is a stake address, or the amount is zero.
    pub fn new(recipient: Address, amount: Lovelace, network: Network) -> Result<Self> {
        if recipient.network_id() != network.network_id() {
            return Err(Error::network_mismatch(network, recipient.network_id()));
        }
        if recipient.is_stake_address() {
            return Err(Error::InvalidAddress(
                "cannot pay to a stake address".to_string(),
            ));
        }
        if amount == Lovelace::ZERO {
            return Err(Error::InvalidAmount(
                "payment amount must be positive".to_string(),
            ));
        }
        Ok(Self {
            recipient,
            amount,
            network,
        })
    }

    pub fn recipient(&self) -> &Address {
        &self.recipient
    }

    pub fn amount(&self) -> Lovelace {
        self.amount
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    pub address: Address,
    pub amount: Lovelace,
}

/// A balanced transaction waiting for the wallet's signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    inputs: Vec<Utxo>,
    outputs: Vec<TxOutput>,
    fee: Lovelace,
    body: Vec<u8>,
    estimated_size: usize,
}

impl UnsignedTransaction {
    pub fn inputs(&self) -> &[Utxo] {
        &self.inputs
    }

    /// The payment output comes first, change (if any) second.
    pub fn outputs(&self) -> &[TxOutput] {
        &self.outputs
    }

    pub fn payment(&self) -> Option<&TxOutput> {
        self.outputs.first()
    }

    pub fn change(&self) -> Option<&TxOutput> {
        self.outputs.get(1)
    }

    pub fn fee(&self) -> Lovelace {
        self.fee
    }

    /// CBOR encoded transaction body, `{0: inputs, 1: outputs, 2: fee}`.
    pub fn body_cbor(&self) -> &[u8] {
        &self.body
    }

    /// Id the transaction will have on chain. Signing adds witnesses but leaves the body alone.
    pub fn tx_hash(&self) -> TxHash {
        TxHash::of_body(&self.body)
    }

    /// Estimated size once signed, the figure the fee was computed from.
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    /// Full transaction with an empty witness set, the form CIP-30 `signTx` expects.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        encode(|e| {
            e.array(4)?;
            e.writer_mut().extend_from_slice(&self.body);
            e.map(0)?.bool(true)?.null()?;
            Ok(())
        })
    }

    pub fn to_cbor_hex(&self) -> Result<String> {
        Ok(hex::encode(self.to_cbor()?))
    }
}

/// Id of a signed transaction, hashed over the body it carries.
///
/// `None` when `signed` is not a CBOR array starting with a body map.
pub fn signed_tx_hash(signed: &[u8]) -> Option<TxHash> {
    let mut decoder = Decoder::new(signed);
    let _ = decoder.array().ok()?;
    if !matches!(decoder.datatype().ok()?, Type::Map | Type::MapIndef) {
        return None;
    }
    let start = decoder.position();
    decoder.skip().ok()?;
    signed.get(start..decoder.position()).map(TxHash::of_body)
}

/// Selects inputs largest first and balances a payment of `request.amount()`.
///
/// Change below the min-utxo value is folded into the fee.
pub fn build_payment(
    mut utxos: Vec<Utxo>,
    request: &PaymentRequest,
    change_address: &Address,
    params: &ProtocolParameters,
) -> Result<UnsignedTransaction> {
    let payment = TxOutput {
        address: request.recipient().clone(),
        amount: request.amount(),
    };
    let minimum = min_utxo(params, &payment)?;
    if payment.amount < minimum {
        return Err(Error::OutputBelowMinimum {
            amount: payment.amount,
            minimum,
        });
    }

    utxos.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.input.cmp(&b.input)));

    let mut available = Lovelace::ZERO;
    let mut required = payment.amount;
    for selected in 1..=utxos.len() {
        let inputs = &utxos[..selected];
        available = sum(inputs)?;
        if available < required {
            continue;
        }
        match balance(inputs, &payment, change_address, params)? {
            Balance::Done(tx) => {
                debug!(
                    "Balanced payment of {} with {} input(s), fee {}",
                    payment.amount,
                    tx.inputs.len(),
                    tx.fee
                );
                return Ok(tx);
            }
            Balance::Short { required: needed } => required = needed,
        }
    }

    // every input was too small to even attempt a balance, estimate the fee over all of them
    if required == payment.amount {
        if let Balance::Short { required: needed } =
            balance(&utxos, &payment, change_address, params)?
        {
            required = needed;
        }
    }

    Err(Error::InsufficientFunds {
        available,
        required,
    })
}

/// `coins_per_utxo_size × (160 + serialized output size)`.
pub fn min_utxo(params: &ProtocolParameters, output: &TxOutput) -> Result<Lovelace> {
    let size = encode(|e| encode_output(e, output))?.len() as u64;
    UTXO_ENTRY_OVERHEAD
        .checked_add(size)
        .and_then(|bytes| bytes.checked_mul(params.coins_per_utxo_size))
        .map(Lovelace::from_u64)
        .ok_or(Error::NumericOverflow)
}

/// `min_fee_a × size + min_fee_b`.
pub fn fee_for_size(params: &ProtocolParameters, size: usize) -> Result<Lovelace> {
    (size as u64)
        .checked_mul(params.min_fee_a)
        .and_then(|fee| fee.checked_add(params.min_fee_b))
        .map(Lovelace::from_u64)
        .ok_or(Error::NumericOverflow)
}

enum Balance {
    Done(UnsignedTransaction),
    Short { required: Lovelace },
}

fn balance(
    inputs: &[Utxo],
    payment: &TxOutput,
    change_address: &Address,
    params: &ProtocolParameters,
) -> Result<Balance> {
    let total_in = sum(inputs)?;
    let witnesses = inputs
        .iter()
        .map(|utxo| utxo.address.as_bytes())
        .collect::<BTreeSet<_>>()
        .len();

    let mut fee = Lovelace::from_u64(params.min_fee_b);
    for _ in 0..MAX_FEE_ITERATIONS {
        let needed = payment.amount.try_add(fee)?;
        let Some(remainder) = total_in.checked_sub(needed) else {
            let body = encode_body(inputs, std::slice::from_ref(payment), fee)?;
            let estimate = fee_for_size(params, signed_size(body.len(), witnesses))?;
            return Ok(Balance::Short {
                required: payment.amount.try_add(std::cmp::max(fee, estimate))?,
            });
        };

        let mut outputs = vec![payment.clone()];
        let mut effective_fee = fee;
        if remainder > Lovelace::ZERO {
            let change = TxOutput {
                address: change_address.clone(),
                amount: remainder,
            };
            if remainder >= min_utxo(params, &change)? {
                outputs.push(change);
            } else {
                trace!("Folding {remainder} of dust change into the fee");
                effective_fee = fee.try_add(remainder)?;
            }
        }

        let body = encode_body(inputs, &outputs, effective_fee)?;
        let size = signed_size(body.len(), witnesses);
        if size as u64 > params.max_tx_size {
            return Err(Error::TransactionTooLarge {
                size,
                max: params.max_tx_size,
            });
        }

        let required_fee = fee_for_size(params, size)?;
        if required_fee <= effective_fee {
            return Ok(Balance::Done(UnsignedTransaction {
                inputs: inputs.to_vec(),
                outputs,
                fee: effective_fee,
                body,
                estimated_size: size,
            }));
        }
        fee = required_fee;
    }

    Err(Error::Encoding(format!(
        "fee did not settle after {MAX_FEE_ITERATIONS} iterations"
    )))
}

fn signed_size(body_len: usize, witnesses: usize) -> usize {
    body_len + WITNESS_SET_OVERHEAD + witnesses * VKEY_WITNESS_SIZE + ENVELOPE_OVERHEAD
}

fn sum(utxos: &[Utxo]) -> Result<Lovelace> {
    utxos
        .iter()
        .try_fold(Lovelace::ZERO, |acc, utxo| acc.try_add(utxo.amount))
}

fn encode_body(inputs: &[Utxo], outputs: &[TxOutput], fee: Lovelace) -> Result<Vec<u8>> {
    encode(|e| {
        e.map(3)?;
        e.u8(0)?.array(inputs.len() as u64)?;
        for utxo in inputs {
            e.array(2)?
                .bytes(utxo.input.tx_hash.as_bytes())?
                .u32(utxo.input.index)?;
        }
        e.u8(1)?.array(outputs.len() as u64)?;
        for output in outputs {
            encode_output(e, output)?;
        }
        e.u8(2)?.u64(fee.as_u64())?;
        Ok(())
    })
}

fn encode_output(e: &mut Encoder<Vec<u8>>, output: &TxOutput) -> EncodeResult {
    e.array(2)?
        .bytes(output.address.as_bytes())?
        .u64(output.amount.as_u64())?;
    Ok(())
}

fn encode<F>(write: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Encoder<Vec<u8>>) -> EncodeResult,
{
    let mut encoder = Encoder::new(Vec::new());
    write(&mut encoder).map_err(|err| Error::Encoding(err.to_string()))?;
    Ok(encoder.into_writer())
}
