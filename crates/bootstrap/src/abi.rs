//! Fixed ABI of the external contract collaborators.
//!
//! The token, factory, router and pair contracts are opaque to this crate:
//! only the function surface below is relied upon. Constructor arguments
//! are encoded with [`alloy_sol_types::SolValue::abi_encode_params`] at the
//! call sites.

use alloy_sol_types::sol;

sol! {
    /// Mintable ERC-20 test token (both TokenA and TokenB).
    interface IErc20 {
        function mint(address to, uint256 amount);
        function balanceOf(address owner) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Pair factory.
    interface IDexFactory {
        function createPair(address tokenA, address tokenB) external returns (address pair);
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }

    /// Liquidity router. Note: the four-argument form, not Uniswap's.
    interface IDexRouter {
        function addLiquidity(address tokenA, address tokenB, uint256 amountADesired, uint256 amountBDesired) external;
    }

    /// Two-token liquidity pool.
    interface IDexPair {
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }
}
