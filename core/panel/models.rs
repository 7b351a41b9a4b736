


/*  > ---------------------------------------------------------------------------------------------
    |
    |   admin_users ---> operators of the back office and their login
    |   withdrawals ---> withdrawal requests, the listing rows and status updates
    |   stats       ---> aggregate rows and the statistics report built from them
    |
*/

pub mod admin_users;
pub mod withdrawals;
pub mod stats;
